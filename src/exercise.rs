use clap::ValueEnum;
use rand::Rng;
use std::collections::VecDeque;
use std::fmt;
use std::ops::RangeInclusive;

/// Upper bound on candidates drawn before giving up on a valid problem
pub const MAX_ATTEMPTS: u32 = 100;

/// Every accepted result lies in this range
pub const RESULT_RANGE: RangeInclusive<i64> = 0..=100;

const SMALL_OPERANDS: RangeInclusive<u32> = 1..=10;
const LARGE_OPERANDS: RangeInclusive<u32> = 1..=100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    /// Exact result of `a op b`. Division may be fractional.
    pub fn apply(&self, a: u32, b: u32) -> f64 {
        let (a, b) = (a as f64, b as f64);
        match self {
            Operator::Add => a + b,
            Operator::Subtract => a - b,
            Operator::Multiply => a * b,
            Operator::Divide => a / b,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "×",
            Operator::Divide => ":",
        }
    }

    fn is_mult_or_div(&self) -> bool {
        matches!(self, Operator::Multiply | Operator::Divide)
    }
}

/// Which operators are eligible for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, strum_macros::Display)]
pub enum Mode {
    #[value(name = "add-sub")]
    #[strum(to_string = "+ / -")]
    AdditionSubtraction,
    #[value(name = "mul")]
    #[strum(to_string = "×")]
    Multiplication,
    #[value(name = "mul-div")]
    #[strum(to_string = "× / :")]
    MultiplicationDivision,
    #[value(name = "all")]
    #[strum(to_string = "all together")]
    All,
}

impl Mode {
    /// Menu order
    pub const ALL: [Mode; 4] = [
        Mode::AdditionSubtraction,
        Mode::Multiplication,
        Mode::MultiplicationDivision,
        Mode::All,
    ];

    pub fn operators(&self) -> &'static [Operator] {
        match self {
            Mode::AdditionSubtraction => &[Operator::Add, Operator::Subtract],
            Mode::Multiplication => &[Operator::Multiply],
            Mode::MultiplicationDivision => &[Operator::Multiply, Operator::Divide],
            Mode::All => &[
                Operator::Add,
                Operator::Subtract,
                Operator::Multiply,
                Operator::Divide,
            ],
        }
    }

    /// Modes made only of `×` and `:` draw operands from the small table
    pub fn is_mult_div_only(&self) -> bool {
        self.operators().iter().all(Operator::is_mult_or_div)
    }

    fn operand_range(&self) -> RangeInclusive<u32> {
        if self.is_mult_div_only() {
            SMALL_OPERANDS
        } else {
            LARGE_OPERANDS
        }
    }
}

/// One exercise, read as `a op b = ?`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Problem {
    pub a: u32,
    pub b: u32,
    pub op: Operator,
}

impl Problem {
    pub fn new(a: u32, b: u32, op: Operator) -> Self {
        Self { a, b, op }
    }

    pub fn value(&self) -> f64 {
        self.op.apply(self.a, self.b)
    }

    /// The result when it is a whole number
    pub fn solution(&self) -> Option<i64> {
        let value = self.value();
        if value.is_finite() && value.fract() == 0.0 {
            Some(value as i64)
        } else {
            None
        }
    }

    fn is_within_bounds(&self) -> bool {
        self.solution()
            .map(|result| RESULT_RANGE.contains(&result))
            .unwrap_or(false)
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.a, self.op.symbol(), self.b)
    }
}

/// Source of uniform random draws for the generator
pub trait NumberSource {
    /// Uniform draw from an inclusive range
    fn pick(&mut self, range: RangeInclusive<u32>) -> u32;
}

/// Adapts any `rand` generator
#[derive(Debug, Clone)]
pub struct RandomNumbers<R: Rng> {
    rng: R,
}

impl<R: Rng> RandomNumbers<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomNumbers<rand::rngs::ThreadRng> {
    pub fn thread() -> Self {
        Self::new(rand::thread_rng())
    }
}

impl<R: Rng> NumberSource for RandomNumbers<R> {
    fn pick(&mut self, range: RangeInclusive<u32>) -> u32 {
        self.rng.gen_range(range)
    }
}

/// Replays a fixed sequence of draws, clamped into the requested range.
/// Once exhausted every draw yields the low end of the range.
#[derive(Debug, Clone, Default)]
pub struct ScriptedNumbers {
    draws: VecDeque<u32>,
}

impl ScriptedNumbers {
    pub fn new<I: IntoIterator<Item = u32>>(draws: I) -> Self {
        Self {
            draws: draws.into_iter().collect(),
        }
    }

    pub fn push<I: IntoIterator<Item = u32>>(&mut self, draws: I) {
        self.draws.extend(draws);
    }

    pub fn remaining(&self) -> usize {
        self.draws.len()
    }
}

impl NumberSource for ScriptedNumbers {
    fn pick(&mut self, range: RangeInclusive<u32>) -> u32 {
        let (low, high) = (*range.start(), *range.end());
        self.draws
            .pop_front()
            .map(|n| n.clamp(low, high))
            .unwrap_or(low)
    }
}

/// Outcome of a generation run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Generated {
    /// A valid, unseen problem found on the given attempt
    Accepted { problem: Problem, attempts: u32 },
    /// The last candidate after all attempts were rejected; may be out of
    /// bounds or a repeat
    Fallback { problem: Problem },
}

impl Generated {
    pub fn problem(&self) -> Problem {
        match self {
            Generated::Accepted { problem, .. } | Generated::Fallback { problem } => *problem,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Generated::Fallback { .. })
    }
}

fn draw_candidate<N: NumberSource + ?Sized>(mode: Mode, numbers: &mut N) -> Problem {
    let operators = mode.operators();
    let operands = mode.operand_range();

    let a = numbers.pick(operands.clone());
    let b = numbers.pick(operands);
    let op = operators[numbers.pick(0..=(operators.len() as u32 - 1)) as usize];

    if op == Operator::Divide {
        let divisor = numbers.pick(SMALL_OPERANDS);
        let quotient = numbers.pick(SMALL_OPERANDS);
        return Problem::new(divisor * quotient, divisor, op);
    }

    Problem::new(a, b, op)
}

/// Draws a problem for `mode` that is in bounds and not already in `existing`,
/// falling back to the last candidate after [`MAX_ATTEMPTS`].
pub fn generate<N: NumberSource + ?Sized>(
    mode: Mode,
    existing: &[Problem],
    numbers: &mut N,
) -> Generated {
    let mut attempts = 0;

    loop {
        let candidate = draw_candidate(mode, numbers);
        attempts += 1;

        if candidate.is_within_bounds() && !existing.contains(&candidate) {
            return Generated::Accepted {
                problem: candidate,
                attempts,
            };
        }

        if attempts >= MAX_ATTEMPTS {
            log::warn!(
                "no valid {} problem after {} attempts, falling back to {}",
                mode,
                attempts,
                candidate
            );
            return Generated::Fallback { problem: candidate };
        }
    }
}
