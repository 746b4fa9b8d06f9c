use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use l_star::dfa::{Dfa, StateId};
use l_star::error::LearnError;
use l_star::oracle::equivalence::{InteractiveEquivalenceOracle, LogSampleEquivalenceOracle, ReferenceOracle};
use l_star::oracle::membership::{load_token_sample, CachingOracle, InteractiveOracle, MembershipOracle};
use l_star::learn_with_trace;

#[derive(Parser)]
#[command(name = "l_star", about = "Infers a minimal DFA via Angluin's L* algorithm")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Learn one of the worked scenarios from the spec's test suite
    /// against a known reference DFA via a bounded-BFS equivalence oracle.
    Demo {
        #[arg(value_enum)]
        scenario: Scenario,
        /// Dump the observation table as table_<n>.csv into this directory
        /// on every outer-loop iteration (spec §6 debugging artefact).
        #[arg(long)]
        trace_dir: Option<PathBuf>,
    },
    /// Learn a language described by a log file: a CSV with an `output`
    /// column of space-separated tokens, `\epsilon` denoting ε.
    FromLog {
        membership_log: PathBuf,
        equivalence_log: Option<PathBuf>,
        #[arg(long)]
        trace_dir: Option<PathBuf>,
    },
    /// Learn interactively: prompts on stdin for both membership and
    /// equivalence queries.
    Interactive {
        /// Alphabet symbols, e.g. "a,b"
        #[arg(value_delimiter = ',')]
        alphabet: Vec<String>,
        #[arg(long)]
        trace_dir: Option<PathBuf>,
    },
}

#[derive(Copy, Clone, ValueEnum)]
pub enum Scenario {
    EmptyLanguage,
    OnlyEpsilon,
    EndsInA,
    EvenZeros,
    LengthMod3,
    OddOnes,
}

impl Scenario {
    fn build(self) -> Dfa<char> {
        match self {
            Scenario::EmptyLanguage => Dfa::new(
                vec!['a', 'b'],
                StateId(0),
                vec![false],
                vec![vec![StateId(0), StateId(0)]],
            ),
            Scenario::OnlyEpsilon => Dfa::new(
                vec!['a', 'b'],
                StateId(0),
                vec![true, false],
                vec![vec![StateId(1), StateId(1)], vec![StateId(1), StateId(1)]],
            ),
            Scenario::EndsInA => Dfa::new(
                vec!['a', 'b'],
                StateId(0),
                vec![false, true],
                vec![vec![StateId(1), StateId(0)], vec![StateId(1), StateId(0)]],
            ),
            Scenario::EvenZeros => Dfa::new(
                vec!['0', '1'],
                StateId(0),
                vec![true, false],
                vec![vec![StateId(1), StateId(0)], vec![StateId(0), StateId(1)]],
            ),
            Scenario::LengthMod3 => Dfa::new(
                vec!['0', '1'],
                StateId(0),
                vec![true, false, false],
                vec![
                    vec![StateId(1), StateId(1)],
                    vec![StateId(2), StateId(2)],
                    vec![StateId(0), StateId(0)],
                ],
            ),
            Scenario::OddOnes => Dfa::new(
                vec!['0', '1'],
                StateId(0),
                vec![false, true],
                vec![vec![StateId(0), StateId(1)], vec![StateId(1), StateId(0)]],
            ),
        }
    }
}

struct TargetMembership(Dfa<char>);
impl MembershipOracle<char> for TargetMembership {
    fn ask(&mut self, w: &[char]) -> Result<bool, LearnError> {
        self.0.run(w)
    }
}

pub fn run(cli: Cli) -> Result<(), LearnError> {
    match cli.command {
        Command::Demo { scenario, trace_dir } => run_demo(scenario, trace_dir),
        Command::FromLog { membership_log, equivalence_log, trace_dir } => {
            run_from_log(membership_log, equivalence_log, trace_dir)
        }
        Command::Interactive { alphabet, trace_dir } => run_interactive(alphabet, trace_dir),
    }
}

fn prepare_trace_dir(trace_dir: &Option<PathBuf>) -> Result<(), LearnError> {
    if let Some(dir) = trace_dir {
        std::fs::create_dir_all(dir)?;
    }
    Ok(())
}

fn run_demo(scenario: Scenario, trace_dir: Option<PathBuf>) -> Result<(), LearnError> {
    let target = scenario.build();
    let alphabet = target.alphabet().to_vec();
    let mut membership = CachingOracle::new(TargetMembership(target.clone()));
    let mut equivalence = ReferenceOracle::new(target);

    prepare_trace_dir(&trace_dir)?;
    let (hypothesis, _table) =
        learn_with_trace(&alphabet, &mut membership, &mut equivalence, trace_dir.as_deref())?;
    println!("{}", hypothesis.to_dot());
    Ok(())
}

fn run_from_log(
    membership_log: PathBuf,
    equivalence_log: Option<PathBuf>,
    trace_dir: Option<PathBuf>,
) -> Result<(), LearnError> {
    let membership_sample = load_token_sample(&membership_log)?;
    let alphabet = membership_sample.alphabet();
    let mut membership = CachingOracle::new(membership_sample);

    let equivalence_path = equivalence_log.unwrap_or(membership_log);
    let equivalence_sample = load_token_sample(equivalence_path)?;
    let mut equivalence = LogSampleEquivalenceOracle::new(equivalence_sample.into_sample());

    prepare_trace_dir(&trace_dir)?;
    let (hypothesis, _table) =
        learn_with_trace(&alphabet, &mut membership, &mut equivalence, trace_dir.as_deref())?;
    println!("{}", hypothesis.to_dot());
    Ok(())
}

fn run_interactive(alphabet: Vec<String>, trace_dir: Option<PathBuf>) -> Result<(), LearnError> {
    let mut membership = CachingOracle::new(InteractiveOracle::stdio());
    let mut equivalence = InteractiveEquivalenceOracle::stdio();

    prepare_trace_dir(&trace_dir)?;
    let (hypothesis, _table) =
        learn_with_trace(&alphabet, &mut membership, &mut equivalence, trace_dir.as_deref())?;
    println!("{}", hypothesis.to_dot());
    Ok(())
}
