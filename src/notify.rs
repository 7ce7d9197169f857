use crate::error::Error;
use std::time::Duration;

pub const PUSHOVER_API_URL: &str = "https://api.pushover.net/1/messages.json";

/// Push-notification transport. The pipeline only needs a send capability
/// with a success/failure outcome; tests substitute a recording
/// implementation.
pub trait Notifier {
    fn send(&self, title: &str, message: &str) -> Result<(), Error>;
}

/// Pushover API client. One POST per alert, 10 second timeout, high
/// priority. Failures are reported to the caller and never retried within
/// the invocation.
pub struct Pushover {
    client: reqwest::blocking::Client,
    token:  String,
    user:   String,
}

impl Pushover {
    pub fn new(token: &str, user: &str) -> Result<Self, Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| Error::Notify(e.to_string()))?;
        Ok(Self {
            client,
            token: token.to_string(),
            user:  user.to_string(),
        })
    }
}

impl Notifier for Pushover {
    fn send(&self, title: &str, message: &str) -> Result<(), Error> {
        let params = [
            ("token",    self.token.as_str()),
            ("user",     self.user.as_str()),
            ("title",    title),
            ("message",  message),
            ("priority", "1"),
        ];

        self.client
            .post(PUSHOVER_API_URL)
            .form(&params)
            .send()
            .and_then(|resp| resp.error_for_status())
            .map_err(|e| Error::Notify(e.to_string()))?;
        Ok(())
    }
}
