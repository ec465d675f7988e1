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

use clap::Parser;
use reqwest::Client;
use std::process;
use std::time::Duration;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use wxbrief::brief::WeatherBrief;
use wxbrief::client::AviationWeatherClient;
use wxbrief::notify::Notifier;

const DEFAULT_API_URL: &str = "https://aviationweather.gov/";
const DEFAULT_TIMEOUT_MILLIS: u64 = 5000;

/// Get a full weather brief for an airport.
#[derive(Debug, Parser)]
#[clap(name = "wxbrief", version = clap::crate_version!())]
struct WxbriefApplication {
    /// ICAO code of the airport (e.g. KJFK, EGLL, FAOR)
    icao: String,
}

#[tokio::main]
async fn main() {
    let opts = WxbriefApplication::parse();
    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_env_filter(
                EnvFilter::builder()
                    .with_default_directive(LevelFilter::INFO.into())
                    .from_env_lossy(),
            )
            .finish(),
    )
    .expect("failed to set tracing subscriber");

    let timeout = Duration::from_millis(DEFAULT_TIMEOUT_MILLIS);
    let http_client = Client::builder().timeout(timeout).build().unwrap_or_else(|e| {
        tracing::error!(message = "unable to initialize HTTP client", error = %e);
        process::exit(1)
    });

    let client = AviationWeatherClient::new(http_client.clone(), DEFAULT_API_URL);
    let notifier = Notifier::from_env(http_client);

    tracing::info!(message = "fetching weather briefing", icao = %opts.icao.to_uppercase());
    let brief = WeatherBrief::fetch(&client, &opts.icao).await;

    println!("\n{}", brief.summary(&opts.icao));

    notifier.send(&brief, &opts.icao).await;
}
