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

//! METAR/TAF weather briefing for aviationweather.gov
//!
//! ## Features
//!
//! `wxbrief` fetches the current METAR and the TAF for a single airport,
//! identified by its four-letter [ICAO code], from the [aviationweather.gov]
//! data API. The raw METAR is additionally expanded into plain English. The
//! assembled brief is printed to stdout and, when a webhook is configured,
//! posted to a Slack-compatible incoming webhook.
//!
//! A stage that fails (network error, empty response, malformed XML,
//! undecodable report) contributes a fixed placeholder string to the brief
//! instead of aborting the run; the process always exits 0.
//!
//! [ICAO code]: https://en.wikipedia.org/wiki/ICAO_airport_code
//! [aviationweather.gov]: https://aviationweather.gov/data/api/
//!
//! ## Usage
//!
//! ```text
//! wxbrief KJFK
//! ```
//!
//! To also post the brief to a webhook, set `SLACK_WEBHOOK_URL`:
//!
//! ```text
//! SLACK_WEBHOOK_URL=https://hooks.slack.com/services/T000/B000/XXXX wxbrief KJFK
//! ```
//!
//! Log verbosity is controlled with the standard `RUST_LOG` variable and
//! defaults to `info`.

pub mod brief;
pub mod client;
pub mod decode;
pub mod notify;
