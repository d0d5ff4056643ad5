//! Blocking MusicBrainz web service client for work lookups.

use std::cell::Cell;
use std::time::{Duration, Instant};

use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::{Direction, Work, WorkCatalog, WorkRelation};
use crate::config::MusicBrainzSettings;
use crate::error::CatalogError;

pub struct MusicBrainzClient {
    base_url: String,
    rate_limit: Duration,
    last_request: Cell<Option<Instant>>,
    agent: ureq::Agent,
}

#[derive(Debug, Deserialize)]
struct WorkResponse {
    id: String,
    title: String,
    #[serde(default)]
    relations: Vec<RelationResponse>,
}

#[derive(Debug, Deserialize)]
struct RecordingResponse {
    #[serde(default)]
    relations: Vec<RelationResponse>,
}

#[derive(Debug, Deserialize)]
struct RelationResponse {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    direction: Option<String>,
    #[serde(default)]
    work: Option<WorkRef>,
}

#[derive(Debug, Deserialize)]
struct WorkRef {
    id: String,
}

impl MusicBrainzClient {
    pub fn new(settings: &MusicBrainzSettings) -> Self {
        let config = ureq::Agent::config_builder()
            .user_agent(settings.user_agent.as_str())
            .timeout_global(Some(Duration::from_secs(settings.timeout_secs)))
            .build();

        Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            rate_limit: Duration::from_millis(settings.rate_limit_ms),
            last_request: Cell::new(None),
            agent: ureq::Agent::new_with_config(config),
        }
    }

    fn wait_rate_limit(&self) {
        if let Some(last) = self.last_request.get() {
            let elapsed = last.elapsed();
            if elapsed < self.rate_limit {
                std::thread::sleep(self.rate_limit - elapsed);
            }
        }
        self.last_request.set(Some(Instant::now()));
    }

    fn lookup<T: DeserializeOwned>(&self, entity: &'static str, id: &str) -> Result<T, CatalogError> {
        self.wait_rate_limit();

        let url = format!("{}/{entity}/{id}", self.base_url);
        tracing::debug!(%url, "musicbrainz lookup");
        let resp = self
            .agent
            .get(&url)
            .query("inc", "work-rels")
            .query("fmt", "json")
            .config()
            .http_status_as_error(false)
            .build()
            .call()
            .map_err(|e| CatalogError::Transport(format!("{url}: {e}")))?;

        let status = resp.status().as_u16();
        if status == 404 {
            return Err(CatalogError::NotFound {
                entity,
                id: id.to_string(),
            });
        }
        if status >= 400 {
            return Err(CatalogError::BadResponse(format!("status {status} for {url}")));
        }

        let body = resp
            .into_body()
            .with_config()
            .limit(1_000_000)
            .read_to_string()
            .map_err(|e| CatalogError::Transport(format!("{url}: {e}")))?;
        serde_json::from_str(&body).map_err(|e| CatalogError::BadResponse(format!("{url}: {e}")))
    }
}

impl WorkCatalog for MusicBrainzClient {
    fn work(&self, id: &str) -> Result<Work, CatalogError> {
        let resp: WorkResponse = self.lookup("work", id)?;
        Ok(work_from_response(resp))
    }

    fn recording_work_id(&self, recording_id: &str) -> Result<Option<String>, CatalogError> {
        let resp: RecordingResponse = self.lookup("recording", recording_id)?;
        Ok(resp
            .relations
            .into_iter()
            .find(|r| r.kind == "performance")
            .and_then(|r| r.work)
            .map(|w| w.id))
    }
}

fn work_from_response(resp: WorkResponse) -> Work {
    let relations = resp
        .relations
        .into_iter()
        .filter_map(|r| {
            let target = r.work?;
            let direction = match r.direction.as_deref() {
                Some("backward") => Direction::Backward,
                _ => Direction::Forward,
            };
            Some(WorkRelation {
                kind: r.kind,
                direction,
                target_id: target.id,
            })
        })
        .collect();

    Work {
        id: resp.id,
        title: resp.title,
        relations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn work_response_keeps_only_work_relations() {
        let json = r#"{
            "id": "w1",
            "title": "Symphony No. 5: I. Allegro con brio",
            "relations": [
                {"type": "parts", "direction": "backward",
                 "work": {"id": "w0", "title": "Symphony No. 5"}},
                {"type": "composer", "direction": "backward",
                 "artist": {"id": "a1"}}
            ]
        }"#;
        let resp: WorkResponse = serde_json::from_str(json).unwrap();
        let work = work_from_response(resp);

        assert_eq!(work.relations.len(), 1);
        assert_eq!(work.parent_id(), Some("w0"));
        assert_eq!(work.relations[0].target_id, "w0");
    }

    #[test]
    fn forward_parts_are_not_parents() {
        let json = r#"{"id": "w0", "title": "Top",
            "relations": [{"type": "parts", "direction": "forward",
                           "work": {"id": "w1", "title": "Child"}}]}"#;
        let work = work_from_response(serde_json::from_str(json).unwrap());
        assert_eq!(work.parent_id(), None);
    }

    #[test]
    fn missing_relations_default_to_empty() {
        let work = work_from_response(serde_json::from_str(r#"{"id": "w", "title": "T"}"#).unwrap());
        assert!(work.relations.is_empty());
    }
}
