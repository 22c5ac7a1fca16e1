use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::config::SocialConfig;
use crate::models::key::ProjectKey;
use crate::moderation::{check_submission, Rejection};
use crate::store::KvStore;

/// One stored comment. Field names match the JSON the page has always written;
/// older entries may lack `time`, `timestamp` or `isOwner`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CommentRecord {
    pub user: String,
    pub text: String,
    /// Display string captured at write time, shown when `timestamp` is unusable
    pub time: String,
    /// RFC 3339 / ISO-8601
    pub timestamp: String,
    pub is_owner: bool,
}

impl CommentRecord {
    /// A record authored by this client at `now`.
    pub fn new_owned(user: &str, text: &str, now: DateTime<Utc>) -> Self {
        CommentRecord {
            user: user.to_string(),
            text: text.to_string(),
            time: "Just now".to_string(),
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            is_owner: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitError {
    Rejected(Rejection),
    Store(String),
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitError::Rejected(r) => write!(f, "{}", r),
            SubmitError::Store(e) => write!(f, "Failed to save comment: {}", e),
        }
    }
}

impl std::error::Error for SubmitError {}

impl From<Rejection> for SubmitError {
    fn from(r: Rejection) -> Self {
        SubmitError::Rejected(r)
    }
}

/// Ordered comment list per project. Every mutation rewrites the whole list;
/// the list index is the record's address for edit and delete.
pub struct CommentRepository<'a> {
    store: &'a dyn KvStore,
    config: &'a SocialConfig,
}

impl<'a> CommentRepository<'a> {
    pub fn new(store: &'a dyn KvStore, config: &'a SocialConfig) -> Self {
        CommentRepository { store, config }
    }

    fn storage_key(&self, key: &ProjectKey) -> String {
        key.comments_key(&self.config.keys.prefix)
    }

    fn parse_list(storage_key: &str, raw: &str) -> Vec<CommentRecord> {
        match serde_json::from_str(raw) {
            Ok(list) => list,
            Err(e) => {
                warn!("Unparsable comment list at {}: {}", storage_key, e);
                vec![]
            }
        }
    }

    /// Raw stored list for display. Absent, unparsable or unreadable data reads as empty.
    fn read_list(&self, storage_key: &str) -> Vec<CommentRecord> {
        match self.store.kv_try_get(storage_key) {
            Ok(Some(raw)) => Self::parse_list(storage_key, &raw),
            Ok(None) => vec![],
            Err(e) => {
                warn!("Failed to read {}: {}", storage_key, e);
                vec![]
            }
        }
    }

    /// Raw stored list ahead of a rewrite. A backend read failure aborts the
    /// mutation so the existing list is never replaced by a partial one.
    fn read_list_for_update(&self, storage_key: &str) -> Result<Vec<CommentRecord>, String> {
        Ok(match self.store.kv_try_get(storage_key)? {
            Some(raw) => Self::parse_list(storage_key, &raw),
            None => vec![],
        })
    }

    fn write_list(&self, storage_key: &str, list: &[CommentRecord]) -> Result<(), String> {
        let json = serde_json::to_string(list).map_err(|e| e.to_string())?;
        self.store.kv_set(storage_key, &json)
    }

    /// Stored comments in insertion order, with legacy junk entries removed.
    /// The filtered list is written back only when something was dropped.
    pub fn load(&self, key: &ProjectKey) -> Vec<CommentRecord> {
        let storage_key = self.storage_key(key);
        let mut comments = self.read_list(&storage_key);

        let purge = &self.config.moderation.legacy_purge;
        let before = comments.len();
        comments.retain(|c| !purge.contains(&c.text));
        let removed = before - comments.len();
        if removed > 0 {
            info!("Purged {} legacy comment(s) from {}", removed, storage_key);
            if let Err(e) = self.write_list(&storage_key, &comments) {
                warn!("Failed to persist purged list {}: {}", storage_key, e);
            }
        }
        comments
    }

    pub fn count(&self, key: &ProjectKey) -> usize {
        self.load(key).len()
    }

    pub fn append(&self, key: &ProjectKey, record: CommentRecord) -> Result<(), String> {
        let storage_key = self.storage_key(key);
        let mut comments = self.read_list_for_update(&storage_key)?;
        comments.push(record);
        debug!("Appending comment #{} to {}", comments.len() - 1, storage_key);
        self.write_list(&storage_key, &comments)
    }

    /// Replace the text of the record at `index`. Returns `Ok(false)` without
    /// touching storage when the index is out of range or the text is blank.
    pub fn edit_at(&self, key: &ProjectKey, index: usize, new_text: &str) -> Result<bool, String> {
        let new_text = new_text.trim();
        if new_text.is_empty() {
            return Ok(false);
        }

        let storage_key = self.storage_key(key);
        let mut comments = self.read_list_for_update(&storage_key)?;
        match comments.get_mut(index) {
            Some(c) => c.text = new_text.to_string(),
            None => {
                debug!("Edit index {} out of range for {}", index, storage_key);
                return Ok(false);
            }
        }
        self.write_list(&storage_key, &comments)?;
        Ok(true)
    }

    /// Remove the record at `index`; later records shift down by one.
    pub fn delete_at(&self, key: &ProjectKey, index: usize) -> Result<bool, String> {
        let storage_key = self.storage_key(key);
        let mut comments = self.read_list_for_update(&storage_key)?;
        if index >= comments.len() {
            debug!("Delete index {} out of range for {}", index, storage_key);
            return Ok(false);
        }
        comments.remove(index);
        self.write_list(&storage_key, &comments)?;
        Ok(true)
    }

    /// Validate and store a new comment from the form, authored at `now`.
    pub fn submit(
        &self,
        key: &ProjectKey,
        name: &str,
        text: &str,
        now: DateTime<Utc>,
    ) -> Result<CommentRecord, SubmitError> {
        check_submission(name, text, &self.config.moderation.blocklist)?;

        let record = CommentRecord::new_owned(name.trim(), text.trim(), now);
        self.append(key, record.clone()).map_err(SubmitError::Store)?;
        Ok(record)
    }
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("{} {} ago", n, unit)
    } else {
        format!("{} {}s ago", n, unit)
    }
}

/// Human age of a comment relative to `now`. Falls back to the stored
/// `time` string when the timestamp is missing or not RFC 3339; a bare
/// date such as "2026-03-14" takes the fallback too.
pub fn relative_time(record: &CommentRecord, now: DateTime<Utc>) -> String {
    let past = match DateTime::parse_from_rfc3339(&record.timestamp) {
        Ok(t) => t.with_timezone(&Utc),
        Err(_) => return record.time.clone(),
    };

    // Floor division so a timestamp slightly in the future still reads "Just now"
    let mins = (now - past).num_milliseconds().div_euclid(60_000);
    if mins < 1 {
        "Just now".to_string()
    } else if mins < 60 {
        plural(mins, "minute")
    } else if mins < 1440 {
        plural(mins / 60, "hour")
    } else {
        plural(mins / 1440, "day")
    }
}

/// "Kevin Lee" -> "@KevinLee"; names already starting with '@' are kept.
pub fn display_handle(user: &str) -> String {
    if user.starts_with('@') {
        user.to_string()
    } else {
        let compact: String = user.chars().filter(|c| !c.is_whitespace()).collect();
        format!("@{}", compact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 12, 0, 0).unwrap()
    }

    fn at(offset_secs: i64) -> CommentRecord {
        CommentRecord::new_owned("Ana", "hi", now() - Duration::seconds(offset_secs))
    }

    #[test]
    fn relative_time_buckets() {
        assert_eq!(relative_time(&at(30), now()), "Just now");
        assert_eq!(relative_time(&at(90), now()), "1 minute ago");
        assert_eq!(relative_time(&at(150), now()), "2 minutes ago");
        assert_eq!(relative_time(&at(5400), now()), "1 hour ago");
        assert_eq!(relative_time(&at(3 * 3600 + 59), now()), "3 hours ago");
        assert_eq!(relative_time(&at(86_400), now()), "1 day ago");
        assert_eq!(relative_time(&at(172_800), now()), "2 days ago");
    }

    #[test]
    fn relative_time_boundaries() {
        assert_eq!(relative_time(&at(59), now()), "Just now");
        assert_eq!(relative_time(&at(60), now()), "1 minute ago");
        assert_eq!(relative_time(&at(3599), now()), "59 minutes ago");
        assert_eq!(relative_time(&at(3600), now()), "1 hour ago");
        assert_eq!(relative_time(&at(86_399), now()), "23 hours ago");
    }

    #[test]
    fn relative_time_future_is_just_now() {
        assert_eq!(relative_time(&at(-600), now()), "Just now");
    }

    #[test]
    fn relative_time_falls_back_to_stored_time() {
        let legacy = CommentRecord {
            user: "Old".to_string(),
            text: "hi".to_string(),
            time: "2 hours ago".to_string(),
            timestamp: String::new(),
            is_owner: false,
        };
        assert_eq!(relative_time(&legacy, now()), "2 hours ago");

        let garbled = CommentRecord {
            timestamp: "yesterday".to_string(),
            time: "10:42".to_string(),
            ..legacy
        };
        assert_eq!(relative_time(&garbled, now()), "10:42");
    }

    #[test]
    fn relative_time_date_only_uses_stored_time() {
        let r = CommentRecord {
            time: "09:15".to_string(),
            timestamp: "2026-03-14".to_string(),
            ..Default::default()
        };
        assert_eq!(relative_time(&r, now()), "09:15");
    }

    #[test]
    fn relative_time_accepts_page_iso_strings() {
        let r = CommentRecord {
            timestamp: "2026-03-14T11:00:00.000Z".to_string(),
            ..Default::default()
        };
        assert_eq!(relative_time(&r, now()), "1 hour ago");
    }

    #[test]
    fn new_owned_shape() {
        let r = CommentRecord::new_owned("Ana", "hello", now());
        assert_eq!(r.time, "Just now");
        assert_eq!(r.timestamp, "2026-03-14T12:00:00.000Z");
        assert!(r.is_owner);
    }

    #[test]
    fn json_field_names() {
        let r = CommentRecord::new_owned("Ana", "hello", now());
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["isOwner"], true);
        assert_eq!(v["user"], "Ana");
        assert!(v.get("is_owner").is_none());
    }

    #[test]
    fn legacy_json_without_optional_fields() {
        let list: Vec<CommentRecord> =
            serde_json::from_str(r#"[{"user":"Sam","text":"nice","time":"1 day ago"}]"#).unwrap();
        assert_eq!(list[0].user, "Sam");
        assert!(!list[0].is_owner);
        assert!(list[0].timestamp.is_empty());
    }

    #[test]
    fn handles() {
        assert_eq!(display_handle("Kevin"), "@Kevin");
        assert_eq!(display_handle("Kevin  Lee"), "@KevinLee");
        assert_eq!(display_handle("@already"), "@already");
        assert_eq!(display_handle(""), "@");
    }
}
