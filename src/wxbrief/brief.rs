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

//! Assembly of a weather brief from the individual fetch and decode stages.
//!
//! This module is the single place where stage failures are absorbed: every
//! error is logged here and replaced by a fixed placeholder string, so one
//! failing stage never prevents the others from contributing to the brief.

use crate::client::{AviationWeatherClient, ClientError};
use crate::decode;

pub const INVALID_ICAO: &str = "Invalid ICAO code.";
pub const METAR_EMPTY: &str = "METAR data not available (empty response).";
pub const METAR_NETWORK: &str = "METAR data not available (network error).";
pub const TAF_EMPTY: &str = "TAF data not available (empty response).";
pub const TAF_NETWORK: &str = "TAF data not available (network error).";
pub const TAF_PARSE: &str = "TAF data not available (parse error).";
pub const TAF_MISSING: &str = "TAF data not available (no forecast found).";
pub const DECODE_ERROR: &str = "Error decoding METAR.";

const PLACEHOLDERS: [&str; 8] = [
    INVALID_ICAO,
    METAR_EMPTY,
    METAR_NETWORK,
    TAF_EMPTY,
    TAF_NETWORK,
    TAF_PARSE,
    TAF_MISSING,
    DECODE_ERROR,
];

/// True iff the string is a valid ICAO airport code: exactly four uppercase
/// ASCII letters. Lowercase input is not accepted.
pub fn is_valid_icao(code: &str) -> bool {
    code.len() == 4 && code.chars().all(|c| c.is_ascii_uppercase())
}

/// True iff the string is one of the fixed unavailability sentinels.
pub fn is_placeholder(text: &str) -> bool {
    PLACEHOLDERS.contains(&text)
}

/// One assembled brief: raw METAR, raw TAF, and the decoded METAR.
/// Each field holds either real data or a placeholder sentinel.
#[derive(Debug)]
pub struct WeatherBrief {
    pub metar: String,
    pub taf: String,
    pub decoded_metar: String,
}

impl WeatherBrief {
    /// Run the fetch and decode stages in order and collect their results.
    ///
    /// An invalid ICAO code short-circuits both fetches; no request is made.
    pub async fn fetch(client: &AviationWeatherClient, icao: &str) -> Self {
        if !is_valid_icao(icao) {
            tracing::error!(message = "invalid ICAO code", icao = %icao);
            return WeatherBrief {
                metar: INVALID_ICAO.to_string(),
                taf: INVALID_ICAO.to_string(),
                decoded_metar: INVALID_ICAO.to_string(),
            };
        }

        let metar = fetch_metar(client, icao).await;
        let taf = fetch_taf(client, icao).await;
        let decoded_metar = decode_metar(&metar);

        WeatherBrief { metar, taf, decoded_metar }
    }

    /// Render the brief for terminal output.
    pub fn summary(&self, icao: &str) -> String {
        format!(
            "*Weather Brief for {}*\n\n*METAR:*\n{}\n\n*TAF:*\n{}\n\n*Decoded METAR:*\n{}",
            icao.to_uppercase(),
            self.metar,
            self.taf,
            self.decoded_metar
        )
    }
}

async fn fetch_metar(client: &AviationWeatherClient, icao: &str) -> String {
    match client.metar(icao).await {
        Ok(raw) => raw,
        Err(e) => {
            tracing::error!(message = "error fetching METAR", error = %e);
            match e {
                ClientError::EmptyBody(_) => METAR_EMPTY.to_string(),
                _ => METAR_NETWORK.to_string(),
            }
        }
    }
}

async fn fetch_taf(client: &AviationWeatherClient, icao: &str) -> String {
    match client.taf(icao).await {
        Ok(forecasts) => {
            if forecasts.is_empty() {
                tracing::warn!(message = "no TAF forecast in response", icao = %icao);
                TAF_MISSING.to_string()
            } else {
                forecasts.join("\n")
            }
        }
        Err(e) => {
            tracing::error!(message = "error fetching TAF", error = %e);
            match e {
                ClientError::EmptyBody(_) => TAF_EMPTY.to_string(),
                ClientError::Xml(_) => TAF_PARSE.to_string(),
                _ => TAF_NETWORK.to_string(),
            }
        }
    }
}

/// Decode a raw METAR into prose. Placeholders pass through unchanged so an
/// earlier stage failure surfaces as-is in the decoded field.
pub fn decode_metar(metar: &str) -> String {
    if is_placeholder(metar) {
        return metar.to_string();
    }
    match decode::decode(metar) {
        Ok(text) => text,
        Err(e) => {
            tracing::error!(message = "error decoding METAR", error = %e);
            DECODE_ERROR.to_string()
        }
    }
}
