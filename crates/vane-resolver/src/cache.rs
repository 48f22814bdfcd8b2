//! TTL-aware response cache.
//!
//! A single mutex-guarded map from (class, type, lowercased qname) to
//! the most recent response for that question. Aging happens on
//! lookup: an entry is usable only while every record it carries still
//! has TTL remaining, computed from the instant it was inserted.

use hashbrown::HashMap;
use parking_lot::Mutex;
use std::time::Instant;

use vane_proto::{Class, Name, Question, ResourceRecord, Type};

use crate::response::Response;

/// Cache key: the question tuple with the name lowercased.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    name: Name,
    qtype: Type,
    qclass: Class,
}

impl CacheKey {
    /// Creates a key, lowercasing the name.
    pub fn new(name: Name, qtype: Type, qclass: Class) -> Self {
        Self {
            name: name.lowercased(),
            qtype,
            qclass,
        }
    }

    /// Creates the key for a question.
    pub fn from_question(question: &Question) -> Self {
        Self::new(question.qname.clone(), question.qtype, question.qclass)
    }
}

#[derive(Debug)]
struct CachedResponse {
    response: Response,
    captured_at: Instant,
}

impl CachedResponse {
    /// True while every record in every section still has TTL left.
    fn is_live(&self, now: Instant) -> bool {
        self.records()
            .all(|r| !r.is_expired(self.captured_at, now))
    }

    fn records(&self) -> impl Iterator<Item = &ResourceRecord> {
        let message = self.response.message();
        message
            .answers()
            .iter()
            .chain(message.authorities())
            .chain(message.additionals())
    }
}

/// The response cache.
#[derive(Debug, Default)]
pub struct ResponseCache {
    entries: Mutex<HashMap<CacheKey, CachedResponse>>,
}

impl ResponseCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a live entry.
    pub fn lookup(&self, key: &CacheKey) -> Option<Response> {
        self.lookup_at(key, Instant::now())
    }

    /// Looks up a live entry against an explicit clock.
    ///
    /// Stale entries are evicted on the way out; the check and the
    /// eviction happen under one lock acquisition.
    pub fn lookup_at(&self, key: &CacheKey, now: Instant) -> Option<Response> {
        let mut entries = self.entries.lock();
        match entries.get(key) {
            Some(entry) if entry.is_live(now) => Some(entry.response.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Inserts a response under the given key.
    ///
    /// Only parsed NOERROR responses carrying at least one question
    /// are cacheable; anything else is dropped. An existing entry for
    /// the key is overwritten.
    pub fn insert(&self, key: CacheKey, response: &Response) {
        self.insert_at(key, response, Instant::now());
    }

    /// Inserts against an explicit clock.
    pub fn insert_at(&self, key: CacheKey, response: &Response, now: Instant) {
        if !response.is_no_error() || response.message().questions().is_empty() {
            return;
        }
        self.entries.lock().insert(
            key,
            CachedResponse {
                response: response.clone(),
                captured_at: now,
            },
        );
    }

    /// Removes every entry.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    /// Returns the number of stored entries, live or not.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Returns true if the cache holds nothing.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;
    use std::str::FromStr;
    use std::time::Duration;
    use vane_proto::{Message, Question, RecordType, ResourceRecord, ResponseCode};

    fn server() -> SocketAddr {
        "192.0.2.53:53".parse().unwrap()
    }

    fn cached_response(name: &str, ttl: u32) -> (CacheKey, Response) {
        let question =
            Question::internet(Name::from_str(name).unwrap(), RecordType::A);
        let key = CacheKey::from_question(&question);

        let mut message = Message::query(42, true, question);
        message.set_response(ResponseCode::NoError);
        message.add_answer(ResourceRecord::a(
            Name::from_str(name).unwrap(),
            ttl,
            std::net::Ipv4Addr::new(192, 0, 2, 10),
        ));

        let wire = message.to_wire();
        (key, Response::from_wire(server(), &wire))
    }

    #[test]
    fn hit_before_expiry_miss_after() {
        let cache = ResponseCache::new();
        let (key, response) = cached_response("example.com", 1);

        let t0 = Instant::now();
        cache.insert_at(key.clone(), &response, t0);

        // Half a second in: elapsed floors to zero, still live.
        let hit = cache
            .lookup_at(&key, t0 + Duration::from_millis(500))
            .expect("entry should be live");
        assert_eq!(
            hit.message().answers(),
            response.message().answers(),
            "cached sections must round-trip unchanged"
        );

        // Two seconds in: expired and evicted.
        assert!(cache.lookup_at(&key, t0 + Duration::from_secs(2)).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn key_is_case_insensitive() {
        let cache = ResponseCache::new();
        let (key, response) = cached_response("Example.COM", 60);
        cache.insert_at(key, &response, Instant::now());

        let lookup_key = CacheKey::from_question(&Question::internet(
            Name::from_str("example.com").unwrap(),
            RecordType::A,
        ));
        assert!(cache.lookup(&lookup_key).is_some());
    }

    #[test]
    fn rejects_error_responses() {
        let cache = ResponseCache::new();

        // Non-NOERROR rcode.
        let question =
            Question::internet(Name::from_str("missing.example").unwrap(), RecordType::A);
        let key = CacheKey::from_question(&question);
        let mut message = Message::query(1, true, question);
        message.set_response(ResponseCode::NXDomain);
        let nxdomain = Response::from_wire(server(), &message.to_wire());
        cache.insert(key.clone(), &nxdomain);
        assert!(cache.is_empty());

        // Synthesized transport failure.
        let failure = Response::failed(None, "Timeout Error");
        cache.insert(key, &failure);
        assert!(cache.is_empty());
    }

    #[test]
    fn rejects_questionless_responses() {
        let cache = ResponseCache::new();
        let mut message = Message::default();
        message.set_response(ResponseCode::NoError);
        let response = Response::from_wire(server(), &message.to_wire());

        let key = CacheKey::new(
            Name::from_str("example.com").unwrap(),
            Type::Known(RecordType::A),
            Class::IN,
        );
        cache.insert(key, &response);
        assert!(cache.is_empty());
    }

    #[test]
    fn last_write_wins() {
        let cache = ResponseCache::new();
        let (key, first) = cached_response("example.com", 60);
        let (_, second) = cached_response("example.com", 120);

        let now = Instant::now();
        cache.insert_at(key.clone(), &first, now);
        cache.insert_at(key.clone(), &second, now);

        let hit = cache.lookup_at(&key, now).unwrap();
        assert_eq!(hit.message().answers()[0].ttl(), 120);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn zero_ttl_is_never_served() {
        let cache = ResponseCache::new();
        let (key, response) = cached_response("example.com", 0);

        let now = Instant::now();
        cache.insert_at(key.clone(), &response, now);
        assert!(cache.lookup_at(&key, now).is_none());
    }
}
