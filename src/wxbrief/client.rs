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

use quick_xml::de::from_str;
use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::{Client, Response, StatusCode, Url};
use serde::Deserialize;
use std::error;
use std::fmt;

#[derive(Debug)]
pub enum ClientError {
    Internal(reqwest::Error),
    Unexpected(StatusCode, Url),
    EmptyBody(Url),
    Xml(quick_xml::DeError),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Internal(e) => write!(f, "{}", e),
            Self::Unexpected(status, url) => write!(f, "unexpected status {} for {}", status, url),
            Self::EmptyBody(url) => write!(f, "empty response body for {}", url),
            Self::Xml(e) => write!(f, "malformed XML response: {}", e),
        }
    }
}

impl error::Error for ClientError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Internal(e) => Some(e),
            Self::Xml(e) => Some(e),
            _ => None,
        }
    }
}

/// Client for the aviationweather.gov data API.
///
/// Two endpoints are used: the raw-text METAR endpoint and the TAF
/// dataserver, which only speaks XML. Responses are returned as close to
/// the wire format as practical; interpreting failures is left to callers.
#[derive(Debug)]
pub struct AviationWeatherClient {
    client: Client,
    base_url: Url,
}

impl AviationWeatherClient {
    const USER_AGENT: &'static str = "wxbrief (https://github.com/wxbrief/wxbrief)";
    const TEXT_RESPONSE: &'static str = "text/plain";
    const XML_RESPONSE: &'static str = "application/xml";
    const TAF_HOURS: &'static str = "24";

    pub fn new(client: Client, base_url: &str) -> Self {
        AviationWeatherClient {
            client,
            base_url: Url::parse(base_url).expect("invalid base URL"),
        }
    }

    /// Fetch the current raw METAR for a station, trimmed of surrounding
    /// whitespace. A 2xx response with a blank body is `ClientError::EmptyBody`.
    pub async fn metar(&self, station: &str) -> Result<String, ClientError> {
        let request_url = self.metar_url(station);
        tracing::debug!(message = "making METAR request", url = %request_url);

        let res = self.make_request(request_url.clone(), Self::TEXT_RESPONSE).await?;
        let body = res.text().await.map_err(ClientError::Internal)?;
        let trimmed = body.trim();
        if trimmed.is_empty() {
            return Err(ClientError::EmptyBody(request_url));
        }

        Ok(trimmed.to_string())
    }

    /// Fetch TAF forecasts for a station from the XML dataserver.
    ///
    /// Returns the forecast text of every `TAF` element in the response,
    /// which may be empty when the station has no published forecast.
    pub async fn taf(&self, station: &str) -> Result<Vec<String>, ClientError> {
        let request_url = self.taf_url(station);
        tracing::debug!(message = "making TAF request", url = %request_url);

        let res = self.make_request(request_url.clone(), Self::XML_RESPONSE).await?;
        let body = res.text().await.map_err(ClientError::Internal)?;
        if body.trim().is_empty() {
            return Err(ClientError::EmptyBody(request_url));
        }

        let parsed: TafResponse = from_str(&body).map_err(ClientError::Xml)?;
        Ok(parsed
            .data
            .map(|d| d.tafs.into_iter().filter_map(|t| t.raw_text).collect())
            .unwrap_or_default())
    }

    async fn make_request(&self, url: Url, accept: &'static str) -> Result<Response, ClientError> {
        let res = self
            .client
            .get(url.clone())
            .header(USER_AGENT, Self::USER_AGENT)
            .header(ACCEPT, accept)
            .send()
            .await
            .map_err(ClientError::Internal)?;

        let status = res.status();
        if status.is_success() {
            Ok(res)
        } else {
            Err(ClientError::Unexpected(status, url))
        }
    }

    fn metar_url(&self, station: &str) -> Url {
        let mut url = self.base_url.clone();
        {
            url.path_segments_mut()
                .map(|mut p| {
                    p.clear().push("api").push("data").push("metar");
                })
                .expect("unable to modify METAR URL path segments");
        }
        url.query_pairs_mut()
            .clear()
            .append_pair("ids", station)
            .append_pair("format", "raw");

        url
    }

    fn taf_url(&self, station: &str) -> Url {
        let mut url = self.base_url.clone();
        {
            url.path_segments_mut()
                .map(|mut p| {
                    p.clear().push("cgi-bin").push("data").push("dataserver.php");
                })
                .expect("unable to modify TAF URL path segments");
        }
        url.query_pairs_mut()
            .clear()
            .append_pair("requestType", "retrieve")
            .append_pair("dataSource", "tafs")
            .append_pair("format", "xml")
            .append_pair("stationString", station)
            .append_pair("hours", Self::TAF_HOURS);

        url
    }
}

// Dataserver response shape: <response><data num_results=".."><TAF>...
// Elements not named here are ignored by serde.
#[derive(Deserialize, Debug)]
pub struct TafResponse {
    #[serde(rename = "data")]
    pub data: Option<TafData>,
}

#[derive(Deserialize, Debug)]
pub struct TafData {
    #[serde(rename = "TAF", default)]
    pub tafs: Vec<Taf>,
}

#[derive(Deserialize, Debug)]
pub struct Taf {
    #[serde(rename = "raw_text")]
    pub raw_text: Option<String>,
}
