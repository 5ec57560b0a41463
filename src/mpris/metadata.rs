//! Track metadata parsing for MPRIS.

use std::collections::HashMap;
use zvariant::{ObjectPath, OwnedObjectPath, OwnedValue};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackMetadata {
    pub title: String,
    pub artist: String,
    /// Length in seconds, if the player reports one.
    pub length: Option<f64>,
    /// Object path identifying the track, required by `SetPosition`.
    pub track_id: Option<OwnedObjectPath>,
}

impl TrackMetadata {
    /// "Artist - Title", or whichever half is present.
    pub fn display_title(&self) -> Option<String> {
        match (self.artist.is_empty(), self.title.is_empty()) {
            (false, false) => Some(format!("{} - {}", self.artist, self.title)),
            (true, false) => Some(self.title.clone()),
            (false, true) => Some(self.artist.clone()),
            (true, true) => None,
        }
    }
}

/// Extract metadata fields from a D-Bus `a{sv}` property map.
///
/// MPRIS defines artist as an array of strings, but some players send a
/// single string; both are accepted. Non-positive lengths are treated as unknown.
pub fn extract_metadata(map: &HashMap<String, OwnedValue>) -> TrackMetadata {
    let title = map.get("xesam:title").and_then(string_of).unwrap_or_default();
    let artist = map
        .get("xesam:artist")
        .and_then(|v| {
            Vec::<String>::try_from(v.try_clone().ok()?)
                .ok()
                .and_then(|v| v.into_iter().next())
                .or_else(|| string_of(v))
        })
        .unwrap_or_default();
    let length = map
        .get("mpris:length")
        .and_then(micros_of)
        .map(micros_to_secs)
        .filter(|secs| *secs > 0.0);
    let track_id = map.get("mpris:trackid").and_then(object_path_of);
    TrackMetadata { title, artist, length, track_id }
}

pub fn micros_to_secs(micros: i64) -> f64 {
    micros as f64 / 1_000_000.0
}

pub fn secs_to_micros(secs: f64) -> i64 {
    let micros = (secs * 1_000_000.0).round();
    if micros.is_finite() { micros as i64 } else { 0 }
}

fn string_of(v: &OwnedValue) -> Option<String> {
    String::try_from(v.try_clone().ok()?).ok()
}

fn micros_of(v: &OwnedValue) -> Option<i64> {
    if let Ok(i) = i64::try_from(v.try_clone().ok()?) {
        return Some(i);
    }
    u64::try_from(v.try_clone().ok()?)
        .ok()
        .and_then(|u| i64::try_from(u).ok())
}

fn object_path_of(v: &OwnedValue) -> Option<OwnedObjectPath> {
    if let Ok(path) = OwnedObjectPath::try_from(v.try_clone().ok()?) {
        return Some(path);
    }
    // Some players send the track id as a plain string.
    let s = string_of(v)?;
    ObjectPath::try_from(s).ok().map(OwnedObjectPath::from)
}
