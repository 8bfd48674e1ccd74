use clap::Parser;
use elixir_control::{RouteName, SessionUser};

use super::*;

#[test]
fn parses_appointment_update() {
    let cli = Cli::try_parse_from(["elixir-cli", "appointment", "update", "9", "--data", r#"{"status":"DONE"}"#])
        .unwrap();
    match cli.command {
        Command::Appointment(AppointmentCommand { command: AppointmentSubcommand::Update { id, data } }) => {
            assert_eq!(id, 9);
            assert_eq!(data, r#"{"status":"DONE"}"#);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn sign_up_requires_known_role() {
    let ok = Cli::try_parse_from([
        "elixir-cli", "sign-up", "--username", "bob", "--password", "pw", "--role", "PATIENT",
    ]);
    assert!(ok.is_ok());

    let err = Cli::try_parse_from([
        "elixir-cli", "sign-up", "--username", "bob", "--password", "pw", "--role", "ADMIN",
    ]);
    assert!(err.is_err());
}

#[test]
fn session_summary_omits_token() {
    let session = Session::signed_in(SessionUser {
        id: 1,
        username: "alice".to_owned(),
        roles: vec![Role::Patient],
        token: "t1".to_owned(),
    })
    .unwrap();

    let summary = session_summary(&session);
    assert_eq!(summary, json!({ "signedIn": true, "id": 1, "username": "alice", "roles": ["PATIENT"] }));
    assert!(!summary.to_string().contains("t1"));
    assert_eq!(session_summary(&Session::signed_out()), json!({ "signedIn": false }));
}

#[test]
fn route_value_reports_last_push() {
    let navigator = RecordingNavigator::default();
    assert_eq!(route_value(&navigator), Value::Null);
    elixir_control::Navigator::push(&navigator, RouteName::SignIn);
    elixir_control::Navigator::push(&navigator, RouteName::Booking);
    assert_eq!(route_value(&navigator), json!("booking"));
}

#[test]
fn response_value_falls_back_to_status() {
    let empty = HttpResponse { status: 204, data: Value::Null };
    assert_eq!(response_value(&empty), json!({ "status": 204 }));
    let full = HttpResponse { status: 200, data: json!([{ "id": 1 }]) };
    assert_eq!(response_value(&full), json!([{ "id": 1 }]));
}

#[test]
fn http_errors_display_without_extra_prefix() {
    let http = HttpError::Status { status: 404, message: "Appointment not found".to_owned() };
    assert_eq!(CliError::from(http.clone()).to_string(), http.to_string());
}
