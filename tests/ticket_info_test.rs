use lotto_assist::TicketInfo;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

fn hash_of(info: &TicketInfo) -> u64 {
    let mut hasher = DefaultHasher::new();
    info.hash(&mut hasher);
    hasher.finish()
}

/// 一張兩注的彩券，順序要跟輸入一樣
#[test]
fn test_two_game_ticket_keeps_order() {
    let info = TicketInfo::new(37, vec![vec![3, 11, 22, 28, 33, 40], vec![5, 9, 14, 21, 30, 44]]);

    assert_eq!(info.round(), 37);
    assert_eq!(info.games().len(), 2);
    assert!(info.games().iter().all(|game| game.len() == 6));
    assert_eq!(info.games()[0], vec![3, 11, 22, 28, 33, 40]);
    assert_eq!(info.games()[1], vec![5, 9, 14, 21, 30, 44]);
}

#[test]
fn test_equality_and_hash_are_structural() {
    let a = TicketInfo::new(1, vec![vec![1, 2]]);
    let b = TicketInfo::new(1, vec![vec![1, 2]]);

    assert_eq!(a, b);
    assert_eq!(hash_of(&a), hash_of(&b));
    assert_ne!(a, TicketInfo::new(2, vec![vec![1, 2]]));
}

#[test]
fn test_copy_semantics() {
    let original = TicketInfo::new(1, vec![vec![1, 2]]);

    let same = original.copy(None, None);
    assert_eq!(same, original);
    assert!(!std::ptr::eq(&same, &original));

    assert_eq!(original.copy(Some(5), None), TicketInfo::new(5, vec![vec![1, 2]]));
    assert_eq!(original, TicketInfo::new(1, vec![vec![1, 2]]));
}

#[test]
fn test_positional_destructuring() {
    let (round, games) = TicketInfo::new(37, vec![vec![1]]).into_parts();
    assert_eq!(round, 37);
    assert_eq!(games, vec![vec![1]]);
}

#[test]
fn test_display_mentions_both_fields() {
    let rendered = TicketInfo::new(37, vec![vec![3, 11]]).to_string();
    assert!(rendered.contains("37"));
    assert!(rendered.contains("[[3, 11]]"));
}
