use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use crate::format::parse_date;
use crate::models::{CastMember, CombinedCredit, CrewMember};

/// Cap on the person page's credit timeline.
pub const CREDITS_LIMIT: usize = 20;
pub const KNOWN_FOR_LIMIT: usize = 8;
pub const TOP_CAST_LIMIT: usize = 12;

/// Newest first; undated credits last. Equal dates keep their input order.
pub fn sort_by_date_desc(mut credits: Vec<CombinedCredit>, limit: usize) -> Vec<CombinedCredit> {
    credits.sort_by(|a, b| {
        let da = a.date().and_then(parse_date);
        let db = b.date().and_then(parse_date);
        match (da, db) {
            (Some(x), Some(y)) => y.cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    });
    credits.truncate(limit);
    credits
}

/// One entry per title. TMDB lists a crew member once per job, so the jobs (and
/// characters, for multi-role cast) of repeated rows fold into the first row.
pub fn merge_roles(credits: Vec<CombinedCredit>) -> Vec<CombinedCredit> {
    let mut index: HashMap<(i64, String), usize> = HashMap::new();
    let mut merged: Vec<CombinedCredit> = Vec::with_capacity(credits.len());

    for credit in credits {
        let key = (credit.id, credit.media_type.clone());
        match index.get(&key) {
            Some(&at) => {
                let kept = &mut merged[at];
                append_role(&mut kept.job, credit.job, ", ");
                append_role(&mut kept.character, credit.character, " / ");
            }
            None => {
                index.insert(key, merged.len());
                merged.push(credit);
            }
        }
    }
    merged
}

fn append_role(into: &mut Option<String>, role: Option<String>, sep: &str) {
    let Some(role) = role.filter(|r| !r.is_empty()) else {
        return;
    };
    match into {
        Some(existing) if existing.split(sep).any(|r| r == role) => {}
        Some(existing) if !existing.is_empty() => {
            existing.push_str(sep);
            existing.push_str(&role);
        }
        _ => *into = Some(role),
    }
}

/// Most-voted credits, one entry per title.
pub fn known_for(credits: &[CombinedCredit], limit: usize) -> Vec<CombinedCredit> {
    let mut ranked: Vec<&CombinedCredit> = credits.iter().collect();
    ranked.sort_by(|a, b| b.vote_count.cmp(&a.vote_count));

    let mut seen = HashSet::new();
    ranked
        .into_iter()
        .filter(|c| seen.insert((c.id, c.media_type.clone())))
        .take(limit)
        .cloned()
        .collect()
}

pub fn top_cast(cast: &[CastMember], limit: usize) -> Vec<CastMember> {
    let mut ordered = cast.to_vec();
    ordered.sort_by_key(|c| c.order);
    ordered.truncate(limit);
    ordered
}

pub fn crew_with_jobs<'a>(crew: &'a [CrewMember], jobs: &[&str]) -> Vec<&'a CrewMember> {
    let mut seen = HashSet::new();
    crew.iter()
        .filter(|c| jobs.contains(&c.job.as_str()))
        .filter(|c| seen.insert(c.id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credit(id: i64, media_type: &str, date: Option<&str>, votes: i64) -> CombinedCredit {
        CombinedCredit {
            id,
            media_type: media_type.to_string(),
            title: Some(format!("Title {id}")),
            name: None,
            release_date: if media_type == "movie" { date.map(String::from) } else { None },
            first_air_date: if media_type == "tv" { date.map(String::from) } else { None },
            character: None,
            job: None,
            poster_path: None,
            vote_average: 0.0,
            vote_count: votes,
            popularity: 0.0,
            episode_count: None,
        }
    }

    fn ids(credits: &[CombinedCredit]) -> Vec<i64> {
        credits.iter().map(|c| c.id).collect()
    }

    #[test]
    fn sorts_newest_first_across_media_types() {
        let sorted = sort_by_date_desc(
            vec![
                credit(1, "movie", Some("1999-03-31"), 0),
                credit(2, "tv", Some("2021-06-01"), 0),
                credit(3, "movie", Some("2014-10-24"), 0),
            ],
            CREDITS_LIMIT,
        );
        assert_eq!(ids(&sorted), vec![2, 3, 1]);
    }

    #[test]
    fn equal_dates_keep_input_order_and_undated_go_last() {
        let sorted = sort_by_date_desc(
            vec![
                credit(1, "movie", None, 0),
                credit(2, "movie", Some("2020-01-01"), 0),
                credit(3, "movie", Some(""), 0),
                credit(4, "tv", Some("2020-01-01"), 0),
                credit(5, "movie", Some("2020-01-01"), 0),
            ],
            CREDITS_LIMIT,
        );
        assert_eq!(ids(&sorted), vec![2, 4, 5, 1, 3]);
    }

    #[test]
    fn caps_at_limit() {
        let many: Vec<_> = (0..35)
            .map(|i| credit(i, "movie", Some(&format!("{}-01-01", 1980 + i)), 0))
            .collect();
        let sorted = sort_by_date_desc(many, CREDITS_LIMIT);
        assert_eq!(sorted.len(), 20);
        assert_eq!(sorted[0].id, 34);
        assert_eq!(sorted[19].id, 15);
    }

    #[test]
    fn merge_roles_folds_repeated_jobs_into_one_entry() {
        let mut rows = Vec::new();
        for job in ["Director", "Writer", "Producer", "Writer"] {
            let mut c = credit(27205, "movie", Some("2010-07-15"), 0);
            c.job = Some(job.to_string());
            rows.push(c);
        }
        let mut other = credit(27205, "tv", Some("2012-01-01"), 0);
        other.job = Some("Creator".to_string());
        rows.push(other);

        let merged = merge_roles(rows);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].job.as_deref(), Some("Director, Writer, Producer"));
        assert_eq!(merged[1].media_type, "tv");
    }

    #[test]
    fn merge_roles_joins_characters_for_cast() {
        let mut a = credit(1, "movie", None, 0);
        a.character = Some("Hero".to_string());
        let mut b = credit(1, "movie", None, 0);
        b.character = Some("Villain".to_string());
        let merged = merge_roles(vec![a, b]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].character.as_deref(), Some("Hero / Villain"));
    }

    #[test]
    fn known_for_ranks_by_votes_and_dedupes() {
        let credits = vec![
            credit(1, "movie", None, 10),
            credit(2, "movie", None, 500),
            credit(2, "movie", None, 500),
            credit(2, "tv", None, 50),
            credit(3, "movie", None, 100),
        ];
        assert_eq!(ids(&known_for(&credits, 3)), vec![2, 3, 2]);
    }

    #[test]
    fn top_cast_follows_billing_order() {
        let cast: Vec<CastMember> = [(1, 2), (2, 0), (3, 1)]
            .iter()
            .map(|&(id, order)| CastMember {
                id,
                name: format!("Actor {id}"),
                character: None,
                profile_path: None,
                order,
            })
            .collect();
        let top = top_cast(&cast, 2);
        assert_eq!(top.iter().map(|c| c.id).collect::<Vec<_>>(), vec![2, 3]);
    }

    #[test]
    fn crew_filter_dedupes_people() {
        let crew: Vec<CrewMember> = [(1, "Director"), (1, "Director"), (2, "Writer"), (3, "Editor")]
            .iter()
            .map(|&(id, job)| CrewMember {
                id,
                name: format!("Crew {id}"),
                job: job.to_string(),
                department: String::new(),
                profile_path: None,
            })
            .collect();
        let picked = crew_with_jobs(&crew, &["Director", "Writer"]);
        assert_eq!(picked.iter().map(|c| c.id).collect::<Vec<_>>(), vec![1, 2]);
    }
}
