use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::debug;

use crate::error::{AppError, Result};
use crate::pipeline::TextExtractor;

const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

static API_KEY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""INNERTUBE_API_KEY"\s*:\s*"([^"]+)""#).expect("valid INNERTUBE_API_KEY pattern")
});

static API_KEY_FALLBACK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"innertubeApiKey\s*[=:]\s*"([^"]+)""#).expect("valid innertubeApiKey pattern")
});

/// A single caption fragment
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub text: String,
    pub start: f64,
    pub duration: f64,
}

#[derive(Debug, Deserialize)]
struct PlayerResponse {
    captions: Option<CaptionsData>,
    #[serde(rename = "playabilityStatus")]
    playability_status: Option<PlayabilityStatus>,
}

#[derive(Debug, Deserialize)]
struct PlayabilityStatus {
    status: Option<String>,
    reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CaptionsData {
    #[serde(rename = "playerCaptionsTracklistRenderer")]
    player_captions_tracklist_renderer: Option<CaptionTracklistRenderer>,
}

#[derive(Debug, Deserialize)]
struct CaptionTracklistRenderer {
    #[serde(rename = "captionTracks")]
    caption_tracks: Option<Vec<CaptionTrack>>,
}

#[derive(Debug, Deserialize)]
struct CaptionTrack {
    #[serde(rename = "baseUrl")]
    base_url: String,
    #[serde(rename = "languageCode")]
    language_code: String,
}

/// Derive the video identifier from a YouTube URL.
///
/// Looks for `watch?v=` first and takes everything up to the next `&`,
/// otherwise the path segment after `youtu.be/`. Embed, shorts and playlist
/// URLs are not recognised.
pub fn video_id(url: &str) -> Option<String> {
    let id = if url.contains("watch?v=") {
        url.rsplit("watch?v=").next()?.split('&').next()?
    } else if url.contains("youtu.be/") {
        url.rsplit("youtu.be/")
            .next()?
            .split(['?', '#', '/'])
            .next()?
    } else {
        return None;
    };

    let id = id.split('#').next()?.trim();
    if id.is_empty() {
        None
    } else {
        Some(id.to_string())
    }
}

/// Joins caption texts with single spaces, in transcript order
pub fn join_segments(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Pulls caption text through YouTube's InnerTube player endpoint.
pub struct CaptionExtractor {
    client: Client,
    base_url: String,
    lang: String,
}

impl CaptionExtractor {
    /// `base_url` is the YouTube origin, e.g. `https://www.youtube.com`.
    pub fn new(base_url: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            lang: lang.into(),
        }
    }

    /// Fetch the caption track for `video_id` in the configured language.
    pub async fn fetch_transcript(&self, video_id: &str) -> Result<Vec<Segment>> {
        let watch_url = format!("{}/watch?v={video_id}", self.base_url);
        debug!("Fetching watch page: {watch_url}");

        let page_html = self
            .client
            .get(&watch_url)
            .header("User-Agent", USER_AGENT)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let api_key = extract_api_key(&page_html)?;

        let player_url =
            format!("{}/youtubei/v1/player?key={api_key}&prettyPrint=false", self.base_url);
        let body = serde_json::json!({
            "context": {
                "client": {
                    "hl": self.lang,
                    "gl": "US",
                    "clientName": "WEB",
                    "clientVersion": "2.20241126.01.00"
                }
            },
            "videoId": video_id
        });

        let resp: PlayerResponse = self
            .client
            .post(&player_url)
            .header("User-Agent", USER_AGENT)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let track_url = select_track(resp, video_id, &self.lang)?;
        debug!(lang = %self.lang, "Fetching caption track for {video_id}");

        let caption_xml = self
            .client
            .get(&track_url)
            .header("User-Agent", USER_AGENT)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        parse_caption_xml(&caption_xml)
    }
}

#[async_trait]
impl TextExtractor for CaptionExtractor {
    async fn extract(&self, url: &Url) -> Result<String> {
        let id = video_id(url.as_str()).ok_or_else(|| {
            AppError::CaptionError(format!("could not determine a video id from {url}"))
        })?;
        let segments = self.fetch_transcript(&id).await?;
        debug!(segments = segments.len(), "Transcript retrieved for {id}");
        Ok(join_segments(&segments))
    }
}

fn extract_api_key(html: &str) -> Result<String> {
    API_KEY_RE
        .captures(html)
        .or_else(|| API_KEY_FALLBACK_RE.captures(html))
        .map(|caps| caps[1].to_string())
        .ok_or_else(|| AppError::CaptionError("could not extract InnerTube API key from watch page".into()))
}

fn select_track(resp: PlayerResponse, video_id: &str, lang: &str) -> Result<String> {
    if let Some(status) = &resp.playability_status {
        if status.status.as_deref().is_some_and(|s| s != "OK") {
            let reason = status.reason.as_deref().unwrap_or("video is unavailable");
            return Err(AppError::CaptionError(format!("video {video_id} is unplayable: {reason}")));
        }
    }

    let tracks = resp
        .captions
        .and_then(|c| c.player_captions_tracklist_renderer)
        .and_then(|r| r.caption_tracks)
        .unwrap_or_default();

    if tracks.is_empty() {
        return Err(AppError::CaptionError(format!("no captions available for video {video_id}")));
    }

    tracks
        .into_iter()
        .find(|t| t.language_code == lang)
        .map(|t| t.base_url)
        .ok_or_else(|| {
            AppError::CaptionError(format!("no captions in language '{lang}' for video {video_id}"))
        })
}

fn parse_caption_xml(xml: &str) -> Result<Vec<Segment>> {
    use quick_xml::Reader;
    use quick_xml::events::Event;

    let mut reader = Reader::from_str(xml);
    let mut segments = Vec::new();
    let mut current: Option<(f64, f64)> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) if e.name().as_ref() == b"text" => {
                let mut start = 0.0;
                let mut dur = 0.0;
                for attr in e.attributes().flatten() {
                    let value = String::from_utf8_lossy(&attr.value).parse::<f64>().ok();
                    match attr.key.as_ref() {
                        b"start" => start = value.unwrap_or(0.0),
                        b"dur" => dur = value.unwrap_or(0.0),
                        _ => {}
                    }
                }
                current = Some((start, dur));
            }
            Ok(Event::Text(ref e)) => {
                if let Some((start, duration)) = current.take() {
                    let raw = e
                        .unescape()
                        .map_err(|e| AppError::ParseError(format!("bad caption text: {e}")))?;
                    let text = html_escape::decode_html_entities(&raw).to_string();
                    if !text.is_empty() {
                        segments.push(Segment { text, start, duration });
                    }
                }
            }
            Ok(Event::End(_)) => current = None,
            Ok(Event::Eof) => break,
            Err(e) => return Err(AppError::ParseError(format!("error parsing caption XML: {e}"))),
            _ => {}
        }
    }

    Ok(segments)
}
