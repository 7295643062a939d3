//! Uncertain-match resolution
//!
//! The scorer hands anything it is not confident about to a resolver chosen
//! once per run, instead of branching on an interactivity flag at every call
//! site.

use crate::matching::score::ScoredCandidate;
use crate::types::TrackEntry;
use std::io::{self, BufRead, Write};

/// How many candidates the operator is shown
const PROMPT_CHOICES: usize = 5;

/// Outcome of resolving one uncertain match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Accept the candidate at this index in the scored list
    Accept(usize),
    /// Leave the entry unmatched
    Skip,
}

/// Resolves matches the scorer is not confident about
pub trait MatchResolver {
    fn resolve(&self, entry: &TrackEntry, scored: &[ScoredCandidate<'_>]) -> Resolution;

    /// Name for logging
    fn name(&self) -> &'static str;
}

/// Accepts the top suggestion without asking
pub struct AutoResolver;

impl MatchResolver for AutoResolver {
    fn resolve(&self, _entry: &TrackEntry, _scored: &[ScoredCandidate<'_>]) -> Resolution {
        Resolution::Accept(0)
    }

    fn name(&self) -> &'static str {
        "auto"
    }
}

/// Prompts the operator to choose among the top candidates.
///
/// Empty input accepts the top suggestion; 0 skips the entry; anything else
/// re-prompts.
pub struct PromptResolver;

impl MatchResolver for PromptResolver {
    fn resolve(&self, _entry: &TrackEntry, scored: &[ScoredCandidate<'_>]) -> Resolution {
        let shown = scored.len().min(PROMPT_CHOICES);

        println!("Choose match:");
        for (idx, candidate) in scored[..shown].iter().enumerate() {
            println!(
                "  {}. {} (score={})",
                idx + 1,
                candidate.file.file_name(),
                candidate.score
            );
        }
        println!("  0. Skip this entry");

        let stdin = io::stdin();
        loop {
            print!("Selection [default 1]: ");
            io::stdout().flush().ok();

            let mut line = String::new();
            if stdin.lock().read_line(&mut line).is_err() || line.is_empty() {
                // stdin closed; fall back to the top suggestion
                return Resolution::Accept(0);
            }

            let choice = line.trim();
            if choice.is_empty() {
                return Resolution::Accept(0);
            }
            match choice.parse::<usize>() {
                Ok(0) => return Resolution::Skip,
                Ok(n) if (1..=shown).contains(&n) => return Resolution::Accept(n - 1),
                _ => println!("Invalid selection. Enter a number shown above."),
            }
        }
    }

    fn name(&self) -> &'static str {
        "prompt"
    }
}
