// wxbrief - METAR/TAF weather briefing for aviationweather.gov
//
// Copyright 2025 The wxbrief Authors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.
//

use reqwest::{Client, StatusCode, Url};
use serde::Serialize;
use std::env;
use std::error;
use std::fmt;

use crate::brief::WeatherBrief;

/// Environment variable holding the incoming-webhook URL.
pub const WEBHOOK_ENV_VAR: &str = "SLACK_WEBHOOK_URL";

const ATTACHMENT_COLOR: &str = "#36a64f";
const ATTACHMENT_TITLE: &str = "Weather Information";
const FOOTER_TEXT: &str = "Weather data provided by AviationWeather.gov";
const FOOTER_ICON: &str = "https://www.aviationweather.gov/sites/default/files/favicon.ico";
const THUMB_URL: &str =
    "https://upload.wikimedia.org/wikipedia/commons/thumb/6/67/Weather_icon_001.svg/120px-Weather_icon_001.svg.png";

#[derive(Debug)]
pub enum NotifyError {
    Internal(reqwest::Error),
    Unexpected(StatusCode, Url),
}

impl fmt::Display for NotifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Internal(e) => write!(f, "{}", e),
            Self::Unexpected(status, url) => write!(f, "unexpected status {} for {}", status, url),
        }
    }
}

impl error::Error for NotifyError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Internal(e) => Some(e),
            _ => None,
        }
    }
}

/// Incoming-webhook message: primary markdown text plus styled attachments.
#[derive(Serialize, Debug)]
pub struct WebhookPayload {
    pub text: String,
    pub attachments: Vec<Attachment>,
}

#[derive(Serialize, Debug)]
pub struct Attachment {
    pub color: String,
    pub title: String,
    pub pretext: String,
    pub fields: Vec<AttachmentField>,
    pub footer: String,
    pub footer_icon: String,
    pub thumb_url: String,
}

#[derive(Serialize, Debug)]
pub struct AttachmentField {
    pub title: String,
    pub value: String,
    pub short: bool,
}

/// Build the webhook payload for a brief: one field per brief entry, with
/// the same content repeated in the markdown `text` for clients that do not
/// render attachments.
pub fn payload(brief: &WeatherBrief, icao: &str) -> WebhookPayload {
    let station = icao.to_uppercase();
    WebhookPayload {
        text: format!(
            "*Weather Brief for {}* :airplane: \n\n\
             *METAR* :bar_chart: \n{}\n\n\
             *TAF* :cloud_with_rain: \n{}\n\n\
             *Decoded METAR* :book: \n{}",
            station, brief.metar, brief.taf, brief.decoded_metar
        ),
        attachments: vec![Attachment {
            color: ATTACHMENT_COLOR.to_string(),
            title: ATTACHMENT_TITLE.to_string(),
            pretext: format!("Weather Brief for *{}*", station),
            fields: vec![
                AttachmentField {
                    title: "METAR".to_string(),
                    value: brief.metar.clone(),
                    short: false,
                },
                AttachmentField {
                    title: "TAF".to_string(),
                    value: brief.taf.clone(),
                    short: false,
                },
                AttachmentField {
                    title: "Decoded METAR".to_string(),
                    value: brief.decoded_metar.clone(),
                    short: false,
                },
            ],
            footer: FOOTER_TEXT.to_string(),
            footer_icon: FOOTER_ICON.to_string(),
            thumb_url: THUMB_URL.to_string(),
        }],
    }
}

/// Posts weather briefs to an incoming webhook. Failures are logged and
/// absorbed; a notifier without a configured URL skips the network entirely.
#[derive(Debug)]
pub struct Notifier {
    client: Client,
    webhook_url: Option<Url>,
}

impl Notifier {
    pub fn new(client: Client, webhook_url: Option<Url>) -> Self {
        Notifier { client, webhook_url }
    }

    /// Build a notifier from the `SLACK_WEBHOOK_URL` environment variable.
    /// A missing or malformed value disables notification.
    pub fn from_env(client: Client) -> Self {
        let webhook_url = match env::var(WEBHOOK_ENV_VAR) {
            Ok(raw) => match Url::parse(&raw) {
                Ok(url) => Some(url),
                Err(e) => {
                    tracing::error!(message = "malformed webhook URL", env_var = WEBHOOK_ENV_VAR, error = %e);
                    None
                }
            },
            Err(_) => None,
        };

        Notifier::new(client, webhook_url)
    }

    pub async fn send(&self, brief: &WeatherBrief, icao: &str) {
        let url = match &self.webhook_url {
            Some(url) => url.clone(),
            None => {
                tracing::error!(
                    message = "webhook URL not configured, skipping notification",
                    env_var = WEBHOOK_ENV_VAR
                );
                return;
            }
        };

        let body = payload(brief, icao);
        match self.post(url, &body).await {
            Ok(()) => {
                tracing::info!(message = "weather brief sent to webhook");
            }
            Err(e) => {
                tracing::error!(message = "error sending weather brief to webhook", error = %e);
            }
        }
    }

    async fn post(&self, url: Url, body: &WebhookPayload) -> Result<(), NotifyError> {
        let res = self
            .client
            .post(url.clone())
            .json(body)
            .send()
            .await
            .map_err(NotifyError::Internal)?;

        let status = res.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(NotifyError::Unexpected(status, url))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_brief() -> WeatherBrief {
        WeatherBrief {
            metar: "KJFK 211951Z 18010KT 10SM CLR 25/17 A2992".to_string(),
            taf: "TAF KJFK 211730Z 2118/2224 18012KT P6SM SCT035".to_string(),
            decoded_metar: "station: KJFK".to_string(),
        }
    }

    #[test]
    fn test_payload_structure() {
        let p = payload(&sample_brief(), "kjfk");

        assert!(p.text.starts_with("*Weather Brief for KJFK* :airplane:"));
        assert_eq!(p.attachments.len(), 1);

        let attachment = &p.attachments[0];
        assert_eq!(attachment.color, "#36a64f");
        assert_eq!(attachment.pretext, "Weather Brief for *KJFK*");
        assert_eq!(attachment.fields.len(), 3);
        assert_eq!(attachment.fields[0].title, "METAR");
        assert_eq!(attachment.fields[1].title, "TAF");
        assert_eq!(attachment.fields[2].title, "Decoded METAR");
        assert!(attachment.fields.iter().all(|f| !f.short));
    }

    #[test]
    fn test_payload_serializes_to_expected_json() {
        let value = serde_json::to_value(payload(&sample_brief(), "KJFK")).unwrap();

        assert!(value["text"].as_str().unwrap().contains("*METAR* :bar_chart:"));
        assert_eq!(
            value["attachments"][0]["fields"][1]["value"],
            "TAF KJFK 211730Z 2118/2224 18012KT P6SM SCT035"
        );
        assert_eq!(value["attachments"][0]["footer"], FOOTER_TEXT);
    }

    #[tokio::test]
    async fn test_send_without_webhook_url_is_a_no_op() {
        let notifier = Notifier::new(Client::new(), None);
        // Nothing to assert beyond completion: no URL means no request is made.
        notifier.send(&sample_brief(), "KJFK").await;
    }
}
