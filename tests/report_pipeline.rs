use std::io::Write;

use match_stats::processor::{DateRange, filter_by_date, generate_report, load_records, parse_date};
use tempfile::NamedTempFile;

fn export(contents: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    write!(temp_file, "{}", contents).unwrap();
    temp_file
}

#[test]
fn test_full_report_from_file() {
    let file = export(
        r#"[
            {"like": [{"like": [{"comment": "nice hike photo", "timestamp": "2023-04-01"}]}],
             "match": [{"timestamp": "2023-04-02"}],
             "chats": [{"body": "hey"}, {"body": "hi!"}],
             "we_met": [{"did_meet_subject": "Yes"}]},
            {"like": [{"like": [{"timestamp": "2023-04-03"}]}]},
            {"match": [{"timestamp": "2023-04-05"}]},
            {"match": [{"timestamp": "2023-04-06"}], "block": [{"block_type": "remove"}]},
            {"block": [{"block_type": "remove"}]}
        ]"#,
    );

    let records = load_records(file.path()).unwrap();
    let report = generate_report(&records).unwrap();

    let expected = "\
We met: 1
Match: 3
Chats: 1
Like: 2
Block: 2
Key set: {('block',), ('like',), ('like', 'match', 'chats', 'we_met'), ('match',), ('match', 'block')}
Match from like: 1
Like sent with msg: 1
Like sent no msg: 1
Match from like with msg: 1
Match from like no msg: 0
You unmatched: 1
Incoming like x: 1
Incoming like match: 2
Like with no resp: 1
Num msgs: [2, 0, 0]
";
    assert_eq!(report.to_string(), expected);
}

#[test]
fn test_invalid_json_produces_no_report() {
    let file = export("not valid json");
    let err = load_records(file.path()).unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to parse export file"));
}

#[test]
fn test_malformed_like_aborts_whole_report() {
    let file = export(r#"[{"match": 1}, {"like": [{"like": []}]}]"#);
    let records = load_records(file.path()).unwrap();
    assert!(generate_report(&records).is_err());
}

#[test]
fn test_date_filtered_report_with_extras() {
    let file = export(
        r#"[
            {"like": [{"timestamp": "2023-04-01 21:10:00", "like": [{"comment": "hi"}]}],
             "match": [{"timestamp": "2023-04-02 08:00:00"}],
             "chats": [{"body": "hey you"}, {"body": "coffee tomorrow?"}]},
            {"like": [{"timestamp": "2023-05-20 09:00:00", "like": [{}]}]},
            {"match": [{"timestamp": "2023-04-30 18:00:00"}]},
            {"we_met": [{"did_meet_subject": "No"}]}
        ]"#,
    );

    let records = load_records(file.path()).unwrap();
    let range = DateRange::new(Some(parse_date("2023-04-01").unwrap()), Some(parse_date("2023-04-30").unwrap()));
    let report = generate_report(&filter_by_date(records, &range)).unwrap();

    assert_eq!(report.total_interactions, 2);
    assert_eq!(report.matches, 2);
    assert_eq!(report.likes, 1);
    assert_eq!(report.matched_1_4_messages, 1);
    assert_eq!(report.matched_no_chat, 1);
    assert_eq!(report.num_words, vec![2, 2]);
    assert_eq!(report.word_frequency.get("coffee"), Some(&1));
    assert_eq!(report.likes_by_hr[21], 1);
    assert_eq!(report.matches_by_like_hr[21], 1);
    assert_eq!(report.earliest_date.unwrap().to_string(), "2023-04-01 21:10:00");
    assert_eq!(report.latest_date.unwrap().to_string(), "2023-04-30 18:00:00");
    assert!(report.to_string().starts_with("We met: 0\nMatch: 2\n"));
}
