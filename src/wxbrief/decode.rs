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

//! Expansion of METAR shorthand into labeled English prose.
//!
//! The decoder is deliberately lenient: groups it does not recognize are
//! skipped, and everything after `RMK` is ignored. Only a report with no
//! plausible station group fails outright.

use std::error;
use std::fmt;

#[derive(Debug)]
pub enum DecodeError {
    MissingStation(String),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingStation(report) => write!(f, "no station group in report {:?}", report),
        }
    }
}

impl error::Error for DecodeError {}

const COMPASS_POINTS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

const DESCRIPTORS: [(&str, &str); 8] = [
    ("MI", "shallow"),
    ("PR", "partial"),
    ("BC", "patches of"),
    ("DR", "low drifting"),
    ("BL", "blowing"),
    ("SH", "showers of"),
    ("TS", "thunderstorm with"),
    ("FZ", "freezing"),
];

const PHENOMENA: [(&str, &str); 22] = [
    ("DZ", "drizzle"),
    ("RA", "rain"),
    ("SN", "snow"),
    ("SG", "snow grains"),
    ("IC", "ice crystals"),
    ("PL", "ice pellets"),
    ("GR", "hail"),
    ("GS", "small hail"),
    ("UP", "unknown precipitation"),
    ("BR", "mist"),
    ("FG", "fog"),
    ("FU", "smoke"),
    ("VA", "volcanic ash"),
    ("DU", "widespread dust"),
    ("SA", "sand"),
    ("HZ", "haze"),
    ("PY", "spray"),
    ("PO", "dust whirls"),
    ("SQ", "squalls"),
    ("FC", "funnel cloud"),
    ("SS", "sandstorm"),
    ("DS", "duststorm"),
];

/// Decode a raw METAR into one labeled line per recognized element.
pub fn decode(raw: &str) -> Result<String, DecodeError> {
    let tokens: Vec<&str> = raw.split_whitespace().collect();
    let mut i = 0;

    let mut report_type = "routine report";
    match tokens.first() {
        Some(&"METAR") => i += 1,
        Some(&"SPECI") => {
            report_type = "special report";
            i += 1;
        }
        _ => {}
    }

    let station = match tokens.get(i) {
        Some(&t) if is_station(t) => {
            i += 1;
            t
        }
        _ => return Err(DecodeError::MissingStation(raw.chars().take(32).collect())),
    };

    let mut modifier = None;
    let mut time = None;
    let mut wind: Option<String> = None;
    let mut visibility = None;
    let mut weather = Vec::new();
    let mut sky = Vec::new();
    let mut temperature = None;
    let mut dew_point = None;
    let mut pressure = None;

    while i < tokens.len() {
        let token = tokens[i];
        i += 1;

        if token == "RMK" {
            break;
        }
        // groups are ASCII by definition; anything else is line noise
        if !token.is_ascii() {
            continue;
        }

        match token {
            "AUTO" => {
                modifier = Some("automated observation");
                continue;
            }
            "COR" => {
                modifier = Some("corrected observation");
                continue;
            }
            "NIL" => {
                modifier = Some("missing report");
                continue;
            }
            "CAVOK" => {
                visibility = Some("10 kilometers or more (ceiling and visibility OK)".to_string());
                continue;
            }
            _ => {}
        }

        if time.is_none() {
            if let Some(t) = time_group(token) {
                time = Some(t);
                continue;
            }
        }
        if wind.is_none() {
            if let Some(w) = wind_group(token) {
                wind = Some(w);
                continue;
            }
        }
        if let Some(v) = variable_wind_group(token) {
            if let Some(w) = wind.as_mut() {
                w.push_str(", ");
                w.push_str(&v);
            }
            continue;
        }
        // statute mile visibility split across two groups, e.g. "2 1/2SM"
        if visibility.is_none()
            && token.len() <= 2
            && token.chars().all(|c| c.is_ascii_digit())
            && tokens
                .get(i)
                .map_or(false, |next| next.ends_with("SM") && next.contains('/'))
        {
            if let Some(v) = miles_visibility(tokens[i], Some(token)) {
                visibility = Some(v);
                i += 1;
                continue;
            }
        }
        if visibility.is_none() {
            if let Some(v) = miles_visibility(token, None) {
                visibility = Some(v);
                continue;
            }
            if token.len() == 4 && token.chars().all(|c| c.is_ascii_digit()) {
                visibility = Some(meters_visibility(token));
                continue;
            }
        }
        if temperature.is_none() {
            if let Some((t, d)) = temperature_group(token) {
                temperature = Some(t);
                dew_point = d;
                continue;
            }
        }
        if pressure.is_none() {
            if let Some(p) = pressure_group(token) {
                pressure = Some(p);
                continue;
            }
        }
        if let Some(s) = sky_group(token) {
            sky.push(s);
            continue;
        }
        if let Some(w) = weather_group(token) {
            weather.push(w);
            continue;
        }
        // unrecognized group, skip it
    }

    let mut lines = vec![format!("station: {}", station)];
    match modifier {
        Some(m) => lines.push(format!("type: {} ({})", report_type, m)),
        None => lines.push(format!("type: {}", report_type)),
    }
    if let Some(t) = time {
        lines.push(format!("time: {}", t));
    }
    if let Some(w) = wind {
        lines.push(format!("wind: {}", w));
    }
    if let Some(v) = visibility {
        lines.push(format!("visibility: {}", v));
    }
    if !weather.is_empty() {
        lines.push(format!("weather: {}", weather.join("; ")));
    }
    if !sky.is_empty() {
        lines.push(format!("sky: {}", sky.join("; ")));
    }
    if let Some(t) = temperature {
        lines.push(format!("temperature: {}", t));
    }
    if let Some(d) = dew_point {
        lines.push(format!("dew point: {}", d));
    }
    if let Some(p) = pressure {
        lines.push(format!("pressure: {}", p));
    }

    Ok(lines.join("\n"))
}

fn is_station(token: &str) -> bool {
    token.len() == 4
        && token.chars().next().map_or(false, |c| c.is_ascii_uppercase())
        && token.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
}

fn compass_point(degrees: u32) -> &'static str {
    COMPASS_POINTS[(((degrees % 360) * 10 + 112) / 225) as usize % 16]
}

// ddhhmmZ
fn time_group(token: &str) -> Option<String> {
    let body = token.strip_suffix('Z')?;
    if body.len() != 6 || !body.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let day: u32 = body[..2].parse().ok()?;
    let hour: u32 = body[2..4].parse().ok()?;
    let minute: u32 = body[4..].parse().ok()?;
    if day == 0 || day > 31 || hour > 23 || minute > 59 {
        return None;
    }
    Some(format!("day {} of the month at {:02}:{:02} UTC", day, hour, minute))
}

// dddff(Gff)KT, VRBffKT, and the MPS/KMH unit variants
fn wind_group(token: &str) -> Option<String> {
    let (body, units) = if let Some(b) = token.strip_suffix("KT") {
        (b, "knots")
    } else if let Some(b) = token.strip_suffix("MPS") {
        (b, "meters per second")
    } else if let Some(b) = token.strip_suffix("KMH") {
        (b, "kilometers per hour")
    } else {
        return None;
    };

    let (direction, speeds) = if let Some(rest) = body.strip_prefix("VRB") {
        (None, rest)
    } else {
        if body.len() < 3 {
            return None;
        }
        let (d, rest) = body.split_at(3);
        if !d.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        (Some(d.parse::<u32>().ok()?), rest)
    };

    let (speed_part, gust_part) = match speeds.split_once('G') {
        Some((s, g)) => (s, Some(g)),
        None => (speeds, None),
    };
    if speed_part.is_empty() || !speed_part.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let speed: u32 = speed_part.parse().ok()?;
    let gust = match gust_part {
        Some(g) if !g.is_empty() && g.chars().all(|c| c.is_ascii_digit()) => {
            Some(g.parse::<u32>().ok()?)
        }
        Some(_) => return None,
        None => None,
    };

    let mut out = match direction {
        None => format!("variable at {} {}", speed, units),
        Some(_) if speed == 0 && gust.is_none() => return Some("calm".to_string()),
        Some(d) => format!("from the {} ({} degrees) at {} {}", compass_point(d), d, speed, units),
    };
    if let Some(g) = gust {
        out.push_str(&format!(", gusting to {} {}", g, units));
    }
    Some(out)
}

// dddVddd
fn variable_wind_group(token: &str) -> Option<String> {
    if token.len() != 7 || token.as_bytes()[3] != b'V' {
        return None;
    }
    let from = &token[..3];
    let to = &token[4..];
    if !from.chars().all(|c| c.is_ascii_digit()) || !to.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Some(format!(
        "direction variable between {} and {} degrees",
        from.parse::<u32>().ok()?,
        to.parse::<u32>().ok()?
    ))
}

fn miles_visibility(token: &str, whole: Option<&str>) -> Option<String> {
    let body = token.strip_suffix("SM")?;
    let (body, less_than) = match body.strip_prefix('M') {
        Some(b) => (b, true),
        None => (body, false),
    };
    let (body, greater_than) = match body.strip_prefix('P') {
        Some(b) => (b, true),
        None => (body, false),
    };
    if !body
        .split('/')
        .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()))
    {
        return None;
    }

    let quantity = match whole {
        Some(w) => format!("{} {}", w, body),
        None => body.to_string(),
    };
    let unit = if quantity == "1" { "statute mile" } else { "statute miles" };
    Some(if less_than {
        format!("less than {} {}", quantity, unit)
    } else if greater_than {
        format!("{} {} or more", quantity, unit)
    } else {
        format!("{} {}", quantity, unit)
    })
}

fn meters_visibility(token: &str) -> String {
    if token == "9999" {
        return "10 kilometers or more".to_string();
    }
    // parse to drop leading zeros ("0800" reads as 800 meters)
    match token.parse::<u32>() {
        Ok(meters) => format!("{} meters", meters),
        Err(_) => format!("{} meters", token),
    }
}

// M?dd/M?dd, dew point may be absent ("27/")
fn temperature_group(token: &str) -> Option<(String, Option<String>)> {
    let (t, d) = token.split_once('/')?;
    let temp = signed_degrees(t)?;
    let dew = if d.is_empty() { None } else { Some(signed_degrees(d)?) };
    Some((format!("{} C", temp), dew.map(|v| format!("{} C", v))))
}

fn signed_degrees(body: &str) -> Option<i32> {
    let (digits, negative) = match body.strip_prefix('M') {
        Some(rest) => (rest, true),
        None => (body, false),
    };
    if digits.is_empty() || digits.len() > 2 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let value: i32 = digits.parse().ok()?;
    Some(if negative { -value } else { value })
}

// Annnn (hundredths of inHg) or Qnnnn (hPa)
fn pressure_group(token: &str) -> Option<String> {
    if token.len() != 5 {
        return None;
    }
    let digits = &token[1..];
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    match &token[..1] {
        "A" => {
            let inches = digits.parse::<u32>().ok()? as f64 / 100.0;
            Some(format!("{:.2} inHg", inches))
        }
        "Q" => Some(format!("{} hPa", digits.parse::<u32>().ok()?)),
        _ => None,
    }
}

fn sky_group(token: &str) -> Option<String> {
    match token {
        "SKC" | "CLR" => return Some("clear skies".to_string()),
        "NSC" => return Some("no significant clouds".to_string()),
        "NCD" => return Some("no clouds detected".to_string()),
        _ => {}
    }

    if let Some(rest) = token.strip_prefix("VV") {
        if rest.len() == 3 && rest.chars().all(|c| c.is_ascii_digit()) {
            let hundreds: u32 = rest.parse().ok()?;
            return Some(format!(
                "indefinite ceiling, vertical visibility {} feet",
                hundreds * 100
            ));
        }
        return None;
    }

    if token.len() < 6 {
        return None;
    }
    let (cover, rest) = token.split_at(3);
    let cover_word = match cover {
        "FEW" => "a few clouds",
        "SCT" => "scattered clouds",
        "BKN" => "broken clouds",
        "OVC" => "overcast",
        _ => return None,
    };
    let (altitude, annotation) = rest.split_at(3);
    if !altitude.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let hundreds: u32 = altitude.parse().ok()?;
    let annotation = match annotation {
        "" => "",
        "CB" => " (cumulonimbus)",
        "TCU" => " (towering cumulus)",
        _ => return None,
    };
    Some(format!("{} at {} feet{}", cover_word, hundreds * 100, annotation))
}

fn weather_group(token: &str) -> Option<String> {
    let mut rest = token;
    let mut words: Vec<&'static str> = Vec::new();

    if let Some(stripped) = rest.strip_prefix('-') {
        words.push("light");
        rest = stripped;
    } else if let Some(stripped) = rest.strip_prefix('+') {
        words.push("heavy");
        rest = stripped;
    }
    if let Some(stripped) = rest.strip_prefix("VC") {
        words.push("nearby");
        rest = stripped;
    }

    let mut descriptor: Option<&'static str> = None;
    let mut phenomena: Vec<&'static str> = Vec::new();

    while !rest.is_empty() {
        if rest.len() < 2 {
            return None;
        }
        let (code, tail) = rest.split_at(2);
        if descriptor.is_none() && phenomena.is_empty() {
            if let Some(&(_, word)) = DESCRIPTORS.iter().find(|(c, _)| *c == code) {
                descriptor = Some(word);
                rest = tail;
                continue;
            }
        }
        match PHENOMENA.iter().find(|(c, _)| *c == code) {
            Some(&(_, word)) => {
                phenomena.push(word);
                rest = tail;
            }
            None => return None,
        }
    }

    if descriptor.is_none() && phenomena.is_empty() {
        return None;
    }

    // a descriptor with no phenomenon stands alone
    match (descriptor, phenomena.is_empty()) {
        (Some("thunderstorm with"), true) => words.push("thunderstorm"),
        (Some("showers of"), true) => words.push("showers"),
        (Some(d), _) => words.push(d),
        (None, _) => {}
    }

    let mut out = words.join(" ");
    if !phenomena.is_empty() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(&phenomena.join(" and "));
    }
    Some(out)
}
