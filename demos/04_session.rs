/// login throttling, session persistence and qr login
use chrono::Duration;
use property_kpr_rs::{
    ClientConfig, ClientError, LoginGuard, LoginRequest, LoginResponse, MemoryStore, QrScanner,
    SafeTimeProvider, SessionStore, TimeSource,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = ClientConfig::default();
    let time = SafeTimeProvider::new(TimeSource::Test(chrono::Utc::now()));
    let control = time.test_control().unwrap();

    let mut guard = LoginGuard::new(&config.session);
    let mut session = SessionStore::open(MemoryStore::new(), &config.storage_keys)?;

    // five wrong passwords lock the form
    for _ in 0..config.session.max_login_attempts {
        guard.check(&time)?;
        let _request = LoginRequest::new("budi@example.com", "salah123")?;
        guard.record_failure(&time);
    }
    if let Err(ClientError::LoginLockedOut { remaining_secs }) = guard.check(&time) {
        println!("locked, try again in {} seconds", remaining_secs);
    }

    control.advance(Duration::seconds(config.session.lockout_secs));
    guard.check(&time)?;

    let reply = r#"{"status": true, "results": {"token": "demo-token",
        "user": {"id": 7, "name": "Budi Santoso", "email": "budi@example.com",
                 "photo": null, "joined_at": null}}}"#;
    let response = LoginResponse::from_json(reply)?;
    guard.record_success();
    session.login(response.user, response.token, &time)?;
    println!("authorization: {:?}", session.authorization_header());

    // authorize a web login from the phone
    let mut scanner = QrScanner::new();
    let request = scanner.handle_scan("WEB-LOGIN-123", config.session.app_key.as_deref(), &time)?;
    println!("qr body: {}", serde_json::to_string(&request)?);
    scanner.finish();

    // the api rejected the token
    session.handle_response_status(401, &time)?;
    println!("authenticated after 401: {}", session.is_authenticated());

    for event in session.take_events() {
        println!("{:?}", event);
    }

    Ok(())
}
