//! Blog list statistics
//!
//! Pure functions over an ordered slice of [`BlogRecord`]s. Callers pass the
//! records in store order; every tie is resolved in favour of whatever was
//! seen first, so results are reproducible for a given input order.

use std::collections::HashMap;
use std::hash::Hash;

use serde::Serialize;

use crate::error::EmptyInputError;
use crate::models::BlogRecord;

/// Result of an aggregation that picks a single winner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Ranking<T> {
    Leader(T),
    /// The input held no records.
    EmptyCollection,
}

impl<T> Ranking<T> {
    pub fn leader(&self) -> Option<&T> {
        match self {
            Ranking::Leader(value) => Some(value),
            Ranking::EmptyCollection => None,
        }
    }
}

impl<T> From<Option<T>> for Ranking<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Ranking::EmptyCollection, Ranking::Leader)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorBlogs {
    pub author: Option<String>,
    pub blogs: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorLikes {
    pub author: Option<String>,
    pub likes: u64,
}

/// Summary facts for a blog list, recomputed on every request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSummary {
    pub total_likes: u64,
    pub favorite_blog: Ranking<BlogRecord>,
    pub top_author_by_count: Ranking<AuthorBlogs>,
    pub top_author_by_likes: Ranking<AuthorLikes>,
}

/// Groups `items` by the key `key_fn` extracts.
///
/// Groups come back in the order their key was first seen and each group
/// keeps the input order of its members.
pub fn group_by<'a, T, K, F>(items: &'a [T], key_fn: F) -> Vec<(K, Vec<&'a T>)>
where
    K: Eq + Hash + Clone,
    F: Fn(&'a T) -> K,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Vec<&'a T>)> = Vec::new();

    for item in items {
        let key = key_fn(item);
        match index.get(&key) {
            Some(&slot) => groups[slot].1.push(item),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push((key, vec![item]));
            }
        }
    }

    groups
}

/// Maximum by `score`, keeping the earliest candidate on ties.
///
/// `Iterator::max_by_key` keeps the last one, which would make results
/// depend on more than the first-seen order.
fn first_max_by<T, S, F>(candidates: impl IntoIterator<Item = T>, score: F) -> Option<T>
where
    S: Ord,
    F: Fn(&T) -> S,
{
    let mut best: Option<(S, T)> = None;
    for candidate in candidates {
        let candidate_score = score(&candidate);
        let replace = match &best {
            Some((best_score, _)) => candidate_score > *best_score,
            None => true,
        };
        if replace {
            best = Some((candidate_score, candidate));
        }
    }
    best.map(|(_, value)| value)
}

fn by_author(records: &[BlogRecord]) -> Vec<(Option<&str>, Vec<&BlogRecord>)> {
    group_by(records, |blog| blog.author.as_deref())
}

pub fn total_likes(records: &[BlogRecord]) -> u64 {
    records.iter().map(|blog| blog.likes).sum()
}

/// The most liked record. Ties go to the earliest record.
pub fn favorite_blog(records: &[BlogRecord]) -> Result<&BlogRecord, EmptyInputError> {
    first_max_by(records, |blog| blog.likes).ok_or(EmptyInputError)
}

/// The author with the most records.
pub fn most_blogs(records: &[BlogRecord]) -> Ranking<AuthorBlogs> {
    let counts = by_author(records)
        .into_iter()
        .map(|(author, group)| AuthorBlogs {
            author: author.map(str::to_owned),
            blogs: group.len(),
        });

    first_max_by(counts, |entry| entry.blogs).into()
}

/// The author whose records have the highest like total.
pub fn most_likes(records: &[BlogRecord]) -> Ranking<AuthorLikes> {
    let sums = by_author(records)
        .into_iter()
        .map(|(author, group)| AuthorLikes {
            author: author.map(str::to_owned),
            likes: group.iter().map(|blog| blog.likes).sum(),
        });

    first_max_by(sums, |entry| entry.likes).into()
}

pub fn summarize(records: &[BlogRecord]) -> StatsSummary {
    StatsSummary {
        total_likes: total_likes(records),
        favorite_blog: favorite_blog(records).ok().cloned().into(),
        top_author_by_count: most_blogs(records),
        top_author_by_likes: most_likes(records),
    }
}
