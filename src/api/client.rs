use crate::api::models::*;
use chrono::Utc;
use once_cell::sync::Lazy;
use serde_json::json;

static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(reqwest::Client::new);

const CLIENT_NAME: &str = "Hygge";

/// Thin request/response client for the hosted relational data service.
///
/// Reads the track catalog and issues fire-and-forget activity writes.
/// All write paths are best-effort: callers log and drop failures.
pub struct HyggeClient {
    pub config: BackendConfig,
}

impl HyggeClient {
    pub fn new(config: BackendConfig) -> Self {
        Self { config }
    }

    fn table_url(&self, table: &str, params: &[(&str, &str)]) -> String {
        let mut url = format!("{}/rest/v1/{}", self.config.url, table);
        let mut separator = '?';
        for (key, value) in params {
            url.push(separator);
            url.push_str(key);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
            separator = '&';
        }
        url
    }

    fn post(&self, url: &str, body: serde_json::Value) -> reqwest::RequestBuilder {
        HTTP_CLIENT
            .post(url)
            .header("apikey", &self.config.api_key)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("X-Client-Name", CLIENT_NAME)
            .json(&body)
    }

    /// Full URL for a track's media, resolving storage-relative paths.
    pub fn media_url(&self, track: &Track) -> String {
        let raw = track.media_url.trim();
        if raw.starts_with("http://") || raw.starts_with("https://") {
            return raw.to_string();
        }
        format!(
            "{}/storage/v1/object/public/{}",
            self.config.url,
            raw.trim_start_matches('/')
        )
    }

    /// Fetch the track list for a category, newest first.
    pub async fn fetch_tracks(
        &self,
        kind: TrackKind,
        category: &str,
        subcategory: Option<&str>,
    ) -> Result<Vec<Track>, String> {
        let kind_filter = match kind {
            TrackKind::Audio => "eq.audio",
            TrackKind::Video => "eq.video",
        };
        let category_filter = format!("eq.{category}");
        let mut params = vec![
            ("select", "*"),
            ("kind", kind_filter),
            ("category", category_filter.as_str()),
            ("order", "created_at.desc"),
        ];
        let subcategory_filter = subcategory.map(|s| format!("eq.{s}"));
        if let Some(ref filter) = subcategory_filter {
            params.push(("subcategory", filter.as_str()));
        }

        let url = self.table_url("tracks", &params);
        let response = HTTP_CLIENT
            .get(&url)
            .header("apikey", &self.config.api_key)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !response.status().is_success() {
            return Err(format!("track fetch failed: {}", response.status()));
        }

        response
            .json::<Vec<Track>>()
            .await
            .map_err(|e| e.to_string())
    }

    /// Bump a track's play/view counter. One-shot per playback session.
    pub async fn increment_play_count(&self, track_id: &str) -> Result<(), String> {
        let url = format!("{}/rest/v1/rpc/increment_play_count", self.config.url);
        let response = self
            .post(&url, json!({ "track_id": track_id }))
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !response.status().is_success() {
            return Err(format!("play count increment failed: {}", response.status()));
        }
        Ok(())
    }

    /// Record that this user started the track, for the play history table.
    pub async fn record_play_event(&self, track_id: &str) -> Result<(), String> {
        let url = self.table_url("track_plays", &[]);
        let response = self
            .post(
                &url,
                json!({
                    "id": uuid::Uuid::new_v4().to_string(),
                    "track_id": track_id,
                    "user_id": self.config.user_id,
                    "played_at": Utc::now().to_rfc3339(),
                }),
            )
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !response.status().is_success() {
            return Err(format!("play event insert failed: {}", response.status()));
        }
        Ok(())
    }

    /// Credit whole minutes to the user's daily activity aggregate.
    pub async fn add_activity_minutes(
        &self,
        activity: ActivityKind,
        minutes: u32,
    ) -> Result<(), String> {
        if minutes == 0 {
            return Ok(());
        }

        let url = self.table_url("activity_minutes", &[]);
        let response = self
            .post(
                &url,
                json!({
                    "user_id": self.config.user_id,
                    "day": Utc::now().date_naive().to_string(),
                    "activity": activity.as_str(),
                    "minutes": minutes,
                }),
            )
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !response.status().is_success() {
            return Err(format!("minute report failed: {}", response.status()));
        }
        Ok(())
    }
}
