//! Sources of random sequence pairs.
//!
//! Every call to `next_pair` regenerates the pair in place; the slices borrow
//! the source until the next call.
use bio::alphabets::Alphabet;
use clap::Parser;
use log::info;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::{Seq, Sequence};

/// Something that produces a fresh sequence pair per sample.
pub trait PairSource {
    /// Lengths of the generated `(s1, s2)`.
    fn lengths(&self) -> (usize, usize);

    /// Generate the next pair. The previous pair is overwritten.
    fn next_pair(&mut self) -> (Seq, Seq);

    /// The pair returned by the last `next_pair`.
    fn latest_pair(&self) -> (Seq, Seq);
}

impl<P: PairSource + ?Sized> PairSource for &mut P {
    fn lengths(&self) -> (usize, usize) {
        (**self).lengths()
    }
    fn next_pair(&mut self) -> (Seq, Seq) {
        (**self).next_pair()
    }
    fn latest_pair(&self) -> (Seq, Seq) {
        (**self).latest_pair()
    }
}

/// The symbols of `alphabet`, in increasing order.
pub fn alphabet_symbols(alphabet: &Alphabet) -> Vec<u8> {
    assert!(!alphabet.is_empty(), "Alphabet may not be empty.");
    alphabet.symbols.iter().map(|x| x as u8).collect()
}

/// Overwrite `seq` with `n` symbols drawn uniformly from `symbols`.
pub fn random_sequence_into<R: Rng>(seq: &mut Sequence, n: usize, symbols: &[u8], rng: &mut R) {
    seq.clear();
    seq.extend((0..n).map(|_| symbols[rng.gen_range(0..symbols.len())]));
}

/// Generate a random sequence of length `n` using the given alphabet.
pub fn random_sequence<R: Rng>(n: usize, alphabet: &Alphabet, rng: &mut R) -> Sequence {
    let mut seq = Sequence::with_capacity(n);
    random_sequence_into(&mut seq, n, &alphabet_symbols(alphabet), rng);
    seq
}

/// Independent uniformly random sequences of lengths `n` and `m`.
pub struct IidPairGenerator {
    n: usize,
    m: usize,
    symbols: Vec<u8>,
    rng: ChaCha8Rng,
    a: Sequence,
    b: Sequence,
}

impl IidPairGenerator {
    pub fn new(n: usize, m: usize, alphabet: &Alphabet, seed: u64) -> Self {
        Self {
            n,
            m,
            symbols: alphabet_symbols(alphabet),
            rng: ChaCha8Rng::seed_from_u64(seed),
            a: Sequence::with_capacity(n),
            b: Sequence::with_capacity(m),
        }
    }
}

impl PairSource for IidPairGenerator {
    fn lengths(&self) -> (usize, usize) {
        (self.n, self.m)
    }

    fn next_pair(&mut self) -> (Seq, Seq) {
        random_sequence_into(&mut self.a, self.n, &self.symbols, &mut self.rng);
        random_sequence_into(&mut self.b, self.m, &self.symbols, &mut self.rng);
        (&self.a, &self.b)
    }

    fn latest_pair(&self) -> (Seq, Seq) {
        (&self.a, &self.b)
    }
}

/// Random sequences of length `n`, each paired with the same fixed sequence.
pub struct FixedStringGenerator {
    n: usize,
    fixed: Sequence,
    symbols: Vec<u8>,
    rng: ChaCha8Rng,
    a: Sequence,
}

impl FixedStringGenerator {
    pub fn new(n: usize, fixed: Sequence, alphabet: &Alphabet, seed: u64) -> Self {
        Self {
            n,
            fixed,
            symbols: alphabet_symbols(alphabet),
            rng: ChaCha8Rng::seed_from_u64(seed),
            a: Sequence::with_capacity(n),
        }
    }
}

impl PairSource for FixedStringGenerator {
    fn lengths(&self) -> (usize, usize) {
        (self.n, self.fixed.len())
    }

    fn next_pair(&mut self) -> (Seq, Seq) {
        random_sequence_into(&mut self.a, self.n, &self.symbols, &mut self.rng);
        (&self.a, &self.fixed)
    }

    fn latest_pair(&self) -> (Seq, Seq) {
        (&self.a, &self.fixed)
    }
}

#[derive(Parser, Clone, Debug, Serialize, Deserialize)]
#[clap(next_help_heading = "Generate")]
pub struct GenerateArgs {
    /// Length of the first sequence of each pair
    #[clap(short = 'n', long, default_value_t = 100, display_order = 1)]
    pub length: usize,

    /// Length of the second sequence. Defaults to --length.
    #[clap(short = 'm', long, display_order = 2)]
    pub length2: Option<usize>,

    /// The symbols to draw from
    #[clap(short, long, default_value = "ACGT", display_order = 3)]
    pub alphabet: String,

    /// Seed to initialize RNG for reproducability
    #[clap(long)]
    pub seed: Option<u64>,
}

impl Default for GenerateArgs {
    fn default() -> Self {
        Self {
            length: 100,
            length2: None,
            alphabet: "ACGT".into(),
            seed: None,
        }
    }
}

impl GenerateArgs {
    pub fn lengths(&self) -> (usize, usize) {
        (self.length, self.length2.unwrap_or(self.length))
    }

    pub fn alphabet(&self) -> Alphabet {
        Alphabet::new(self.alphabet.as_bytes())
    }

    /// The given seed, or a random one that is logged so the run can be repeated.
    pub fn seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| {
            let seed = rand::random();
            info!("Using seed {seed}");
            seed
        })
    }

    pub fn pair_generator(&self) -> IidPairGenerator {
        let (n, m) = self.lengths();
        IidPairGenerator::new(n, m, &self.alphabet(), self.seed())
    }
}
