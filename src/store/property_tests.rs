//! Property-Based Tests for the Store Module
//!
//! Drives `StoreState` with generated operation sequences and checks it
//! against a simple model.

use proptest::prelude::*;
use std::collections::{HashMap, HashSet};

use crate::error::StoreError;
use crate::store::{StoreConfig, StoreState, ADMIN};

// == Strategies ==
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-e]{1,2}".prop_map(|s| s)
}

fn value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{0,32}".prop_map(|s| s)
}

fn user_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("user_a".to_string()),
        Just("user_b".to_string()),
        Just("user_c".to_string()),
        Just(ADMIN.to_string()),
    ]
}

#[derive(Debug, Clone)]
enum StoreOp {
    Put { key: String, value: String, user: String },
    Get { key: String, user: String },
    Delete { key: String, user: String },
    List { user: String },
}

fn store_op_strategy() -> impl Strategy<Value = StoreOp> {
    prop_oneof![
        3 => (key_strategy(), value_strategy(), user_strategy())
            .prop_map(|(key, value, user)| StoreOp::Put { key, value, user }),
        2 => (key_strategy(), user_strategy()).prop_map(|(key, user)| StoreOp::Get { key, user }),
        1 => (key_strategy(), user_strategy()).prop_map(|(key, user)| StoreOp::Delete { key, user }),
        1 => user_strategy().prop_map(|user| StoreOp::List { user }),
    ]
}

fn new_state(depth: usize, admin_override: bool) -> StoreState {
    StoreState::new(&StoreConfig {
        depth,
        admin_override,
        ..StoreConfig::default()
    })
}

// == Model ==
#[derive(Debug, Clone)]
struct ModelEntry {
    value: String,
    owner: String,
    writes: u64,
    reads: u64,
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // Unbounded store behaves exactly like an owner-checked map with counters.
    #[test]
    fn prop_matches_model(
        ops in prop::collection::vec(store_op_strategy(), 1..80),
        admin_override in any::<bool>()
    ) {
        let mut state = new_state(0, admin_override);
        let mut model: HashMap<String, ModelEntry> = HashMap::new();

        for (now, op) in ops.into_iter().enumerate() {
            let now = now as u64;
            match op {
                StoreOp::Put { key, value, user } => {
                    let result = state.put(key.clone(), value.clone(), &user, now);
                    match model.get_mut(&key) {
                        Some(entry) => {
                            let allowed = entry.owner == user || (admin_override && user == ADMIN);
                            if allowed {
                                prop_assert!(result.is_ok());
                                entry.value = value;
                                entry.writes += 1;
                            } else {
                                let is_rejected = matches!(result, Err(StoreError::NotAuthorized { .. }));
                                prop_assert!(is_rejected);
                            }
                        }
                        None => {
                            prop_assert!(result.is_ok());
                            model.insert(key, ModelEntry { value, owner: user, writes: 1, reads: 0 });
                        }
                    }
                }
                StoreOp::Get { key, user } => {
                    let result = state.get(&key, &user, now);
                    match model.get_mut(&key) {
                        Some(entry) => {
                            prop_assert_eq!(result, Ok(entry.value.clone()));
                            entry.reads += 1;
                        }
                        None => prop_assert_eq!(result, Err(StoreError::NotFound(key))),
                    }
                }
                StoreOp::Delete { key, user } => {
                    let result = state.delete(&key, &user);
                    match model.get(&key) {
                        None => prop_assert_eq!(result, Err(StoreError::NotFound(key))),
                        Some(entry) => {
                            let allowed = entry.owner == user || (admin_override && user == ADMIN);
                            if allowed {
                                prop_assert!(result.is_ok());
                                model.remove(&key);
                            } else {
                                let is_rejected = matches!(result, Err(StoreError::NotAuthorized { .. }));
                                prop_assert!(is_rejected);
                            }
                        }
                    }
                }
                StoreOp::List { user } => {
                    let listed: HashSet<String> =
                        state.list(&user, now).into_iter().map(|e| e.key).collect();
                    let expected: HashSet<String> = model
                        .iter()
                        .filter(|(_, e)| user == ADMIN || e.owner == user)
                        .map(|(k, _)| k.clone())
                        .collect();
                    prop_assert_eq!(listed, expected);
                }
            }
        }

        prop_assert_eq!(state.len(), model.len());
        for (key, expected) in &model {
            let entry = state.peek(key).unwrap();
            prop_assert_eq!(&entry.value, &expected.value);
            prop_assert_eq!(entry.owner(), expected.owner.as_str());
            prop_assert_eq!(entry.writes(), expected.writes);
            prop_assert_eq!(entry.reads(), expected.reads);
        }
    }

    // Live entries never exceed depth after a put.
    #[test]
    fn prop_depth_enforced(
        ops in prop::collection::vec(store_op_strategy(), 1..120),
        depth in 1usize..6
    ) {
        let mut state = new_state(depth, false);

        for op in ops {
            match op {
                StoreOp::Put { key, value, user } => {
                    let _ = state.put(key, value, &user, 0);
                    prop_assert!(state.len() <= depth, "{} entries exceed depth {}", state.len(), depth);
                }
                StoreOp::Get { key, user } => {
                    let _ = state.get(&key, &user, 0);
                }
                StoreOp::Delete { key, user } => {
                    let _ = state.delete(&key, &user);
                }
                StoreOp::List { user } => {
                    state.list(&user, 0);
                }
            }
        }
    }

    // Inserting D+1 distinct keys leaves the D most recent.
    #[test]
    fn prop_keeps_most_recent_inserts(
        keys in prop::collection::hash_set("[a-z]{1,8}", 2..20),
        depth in 1usize..10
    ) {
        let keys: Vec<String> = keys.into_iter().collect();
        let mut state = new_state(depth, false);

        for key in &keys {
            state.put(key.clone(), "v".to_string(), "user_a", 0).unwrap();
        }

        let kept = depth.min(keys.len());
        let expected: Vec<String> = keys.iter().rev().take(kept).cloned().collect();
        prop_assert_eq!(state.recency(), expected);
    }

    // A Get moves the key to the head, so it is never the next eviction.
    #[test]
    fn prop_get_protects_from_eviction(
        keys in prop::collection::hash_set("[a-z]{1,8}", 3..10),
        pick in any::<prop::sample::Index>()
    ) {
        let keys: Vec<String> = keys.into_iter().collect();
        let depth = keys.len();
        let mut state = new_state(depth, false);

        for key in &keys {
            state.put(key.clone(), "v".to_string(), "user_a", 0).unwrap();
        }

        let touched = pick.get(&keys).clone();
        state.get(&touched, "user_b", 0).unwrap();
        state.put("zz-new-key".to_string(), "v".to_string(), "user_a", 0).unwrap();

        prop_assert!(state.peek(&touched).is_some());
        prop_assert_eq!(state.len(), depth);
    }

    // Listing never changes recency or read counts.
    #[test]
    fn prop_listing_is_read_only(
        keys in prop::collection::hash_set("[a-z]{1,8}", 1..10),
        user in user_strategy()
    ) {
        let mut state = new_state(0, false);
        for key in &keys {
            state.put(key.clone(), "v".to_string(), "user_a", 0).unwrap();
        }
        let before = state.recency();

        state.list(&user, 10);
        for key in &keys {
            let _ = state.list_one(key, &user, 10);
        }

        prop_assert_eq!(state.recency(), before);
        for key in &keys {
            prop_assert_eq!(state.peek(key).unwrap().reads(), 0);
        }
    }
}
