use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, Timelike, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use tracing::{debug, info};

use crate::models::{Field, FieldSignature, InteractionRecord, LikeKind};
use crate::processor::chat_words::{tally_words, word_count};

/// Aggregate counters over one export.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct MatchReport {
    pub total_interactions: usize,
    pub we_met: usize,
    #[serde(rename = "match")]
    pub matches: usize,
    pub chats: usize,
    #[serde(rename = "like")]
    pub likes: usize,
    #[serde(rename = "block")]
    pub blocks: usize,
    pub key_set: BTreeSet<FieldSignature>,
    pub match_from_like: usize,
    pub like_sent_with_msg: usize,
    pub like_sent_no_msg: usize,
    pub match_from_like_with_msg: usize,
    pub match_from_like_no_msg: usize,
    pub you_unmatched: usize,
    pub incoming_like_x: usize,
    pub incoming_like_match: usize,
    pub like_with_no_resp: usize,
    /// Chat length of every matched record, in record order.
    pub num_msgs: Vec<usize>,
    pub matched_no_chat: usize,
    pub matched_1_4_messages: usize,
    pub matched_5plus_messages: usize,
    /// Words per chat message body on matched records.
    pub num_words: Vec<usize>,
    pub word_frequency: BTreeMap<String, usize>,
    /// Likes sent, bucketed by hour of day of the first like event.
    pub likes_by_hr: [usize; 24],
    pub matches_by_like_hr: [usize; 24],
    pub earliest_date: Option<NaiveDateTime>,
    pub latest_date: Option<NaiveDateTime>,
}

impl MatchReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one record into the counters. Checks are independent, so a
    /// record can land in several of them.
    pub fn observe(&mut self, record: &InteractionRecord) -> Result<()> {
        let matched = record.has(Field::Match);
        let liked = record.has(Field::Like);
        let blocked = record.has(Field::Block);

        self.total_interactions += 1;
        self.key_set.insert(record.signature());

        if record.has(Field::WeMet) {
            self.we_met += 1;
        }
        if matched {
            self.matches += 1;
            self.track_date(record, Field::Match);
        }
        if record.has(Field::Chats) {
            self.chats += 1;
        }

        let like_hour = record.event_time(Field::Like).map(|t| t.hour() as usize);
        if let Some(kind) = record.like_kind()? {
            self.likes += 1;
            self.track_date(record, Field::Like);
            if let Some(hour) = like_hour {
                self.likes_by_hr[hour] += 1;
            }
            match kind {
                LikeKind::WithMessage => {
                    self.like_sent_with_msg += 1;
                    if matched {
                        self.match_from_like_with_msg += 1;
                    }
                }
                LikeKind::NoMessage => {
                    self.like_sent_no_msg += 1;
                    if matched {
                        self.match_from_like_no_msg += 1;
                    }
                }
            }
        }

        if blocked {
            self.blocks += 1;
        }
        if liked && matched {
            self.match_from_like += 1;
            if let Some(hour) = like_hour {
                self.matches_by_like_hr[hour] += 1;
            }
        }
        if matched && blocked {
            self.you_unmatched += 1;
        }
        if !matched && blocked {
            self.incoming_like_x += 1;
        }
        if matched && !liked {
            self.incoming_like_match += 1;
        }
        if matched {
            self.num_msgs.push(record.chat_count()?);
            self.observe_chats(record);
        }
        if liked && !matched {
            self.like_with_no_resp += 1;
        }

        Ok(())
    }

    fn observe_chats(&mut self, record: &InteractionRecord) {
        match record.chat_messages().len() {
            0 => self.matched_no_chat += 1,
            1..=4 => self.matched_1_4_messages += 1,
            _ => self.matched_5plus_messages += 1,
        }

        for body in record.chat_bodies() {
            self.num_words.push(word_count(body));
            tally_words(body, &mut self.word_frequency);
        }
    }

    fn track_date(&mut self, record: &InteractionRecord, field: Field) {
        let Some(time) = record.event_time(field) else {
            debug!("No usable {} timestamp for date range", field.key());
            return;
        };
        if self.earliest_date.is_none_or(|earliest| time < earliest) {
            self.earliest_date = Some(time);
        }
        if self.latest_date.is_none_or(|latest| time > latest) {
            self.latest_date = Some(time);
        }
    }

    pub fn to_json(&self) -> Result<String> {
        let stamped = StampedReport {
            generated_at: Utc::now(),
            report: self,
        };
        serde_json::to_string_pretty(&stamped).context("Failed to serialize report")
    }
}

#[derive(Serialize)]
struct StampedReport<'a> {
    generated_at: DateTime<Utc>,
    #[serde(flatten)]
    report: &'a MatchReport,
}

/// Runs the single pass over the export. Nothing is returned unless every
/// record was folded in.
pub fn generate_report(records: &[InteractionRecord]) -> Result<MatchReport> {
    let mut report = MatchReport::new();

    for (index, record) in records.iter().enumerate() {
        report
            .observe(record)
            .with_context(|| format!("Malformed record at index {}", index))?;
    }

    debug!("Observed {} distinct field signatures", report.key_set.len());
    info!(
        "Report covers {} records: {} matches, {} likes",
        records.len(),
        report.matches,
        report.likes
    );

    Ok(report)
}

struct KeySetDisplay<'a>(&'a BTreeSet<FieldSignature>);

impl fmt::Display for KeySetDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "set()");
        }
        write!(f, "{{")?;
        for (i, signature) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", signature)?;
        }
        write!(f, "}}")
    }
}

impl fmt::Display for MatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "We met: {}", self.we_met)?;
        writeln!(f, "Match: {}", self.matches)?;
        writeln!(f, "Chats: {}", self.chats)?;
        writeln!(f, "Like: {}", self.likes)?;
        writeln!(f, "Block: {}", self.blocks)?;
        writeln!(f, "Key set: {}", KeySetDisplay(&self.key_set))?;
        writeln!(f, "Match from like: {}", self.match_from_like)?;
        writeln!(f, "Like sent with msg: {}", self.like_sent_with_msg)?;
        writeln!(f, "Like sent no msg: {}", self.like_sent_no_msg)?;
        writeln!(f, "Match from like with msg: {}", self.match_from_like_with_msg)?;
        writeln!(f, "Match from like no msg: {}", self.match_from_like_no_msg)?;
        writeln!(f, "You unmatched: {}", self.you_unmatched)?;
        writeln!(f, "Incoming like x: {}", self.incoming_like_x)?;
        writeln!(f, "Incoming like match: {}", self.incoming_like_match)?;
        writeln!(f, "Like with no resp: {}", self.like_with_no_resp)?;
        writeln!(f, "Num msgs: {:?}", self.num_msgs)
    }
}
