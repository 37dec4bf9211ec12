use clap::{Parser, Subcommand};
use logic_dojo::widgets::RegisterMode;
use std::path::PathBuf;

/// Logic Dojo - step through textbook digital-design circuits
#[derive(Parser, Debug)]
#[command(name = "logic-dojo")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// TOML settings file (defaults apply when omitted)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Print one JSON object per line instead of text frames
    #[arg(long, global = true, default_value_t = false)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Four-phase traffic light driven by the clock.
    Traffic {
        #[arg(short, long, default_value_t = 22)]
        ticks: usize,

        /// Tick on a real timer at the configured period
        #[arg(long, default_value_t = false)]
        live: bool,
    },
    /// 15-cent vending machine. Coins: 5, 10, nickel, dime.
    Vending {
        #[arg(required = true)]
        coins: Vec<String>,
    },
    /// Overlapping 1011 detector reading a bit tape.
    Sequence {
        /// Bits to feed, e.g. 1011010111 (defaults to the configured tape)
        #[arg(long)]
        tape: Option<String>,

        /// Clock ticks to run (defaults to the tape length)
        #[arg(short, long)]
        ticks: Option<usize>,
    },
    /// SR latch. Inputs are S,R pairs such as 1,0.
    Latch {
        /// Use the NAND latch (active-low inputs)
        #[arg(long, default_value_t = false)]
        nand: bool,

        #[arg(required = true)]
        inputs: Vec<String>,
    },
    /// 4-bit counter with parallel load.
    Counter {
        /// Load this value before counting
        #[arg(long)]
        load: Option<u8>,

        #[arg(short, long, default_value_t = 18)]
        ticks: usize,
    },
    /// Ring or Johnson shift counter.
    Shift {
        #[arg(long, default_value_t = false)]
        johnson: bool,

        #[arg(short, long, default_value_t = 8)]
        ticks: usize,
    },
    /// 4-bit shift register: serial or parallel in, serial or parallel out.
    ShiftRegister {
        #[arg(long, value_enum, default_value = "siso")]
        mode: ModeArg,

        /// Serial input level for each clock, e.g. 1011
        #[arg(long)]
        serial: Option<String>,

        /// Word on the parallel inputs, Q0 first, e.g. 1011
        #[arg(long)]
        parallel: Option<String>,

        /// Clock ticks to run (defaults to the serial length, or 4)
        #[arg(short, long)]
        ticks: Option<usize>,
    },
    /// Two-state machine with Moore (default) or Mealy outputs.
    MealyMoore {
        #[arg(long, default_value_t = false)]
        mealy: bool,

        /// Input level at each clock edge
        #[arg(required = true)]
        bits: Vec<String>,
    },
    /// Bit-serial adder over two operands (MSB first).
    SerialAdder {
        #[arg(long)]
        a: Option<String>,

        #[arg(long)]
        b: Option<String>,
    },
    /// Sign-magnitude, 1's and 2's complement encodings of a value.
    Signed {
        #[arg(allow_hyphen_values = true)]
        value: String,

        #[arg(short, long)]
        width: Option<u8>,
    },
    /// Truth tables and NAND/NOR-only constructions of every gate.
    Gates,
    /// Minimize a 4-variable function (A is the MSB) on a Karnaugh map.
    Kmap {
        /// Minterms where the function is 1, e.g. 1,3,7
        #[arg(long, value_delimiter = ',')]
        ones: Vec<u8>,

        /// Minterms whose value does not matter
        #[arg(long = "dont-care", value_delimiter = ',')]
        dont_care: Vec<u8>,
    },
    /// Previous and next curriculum topics around a slug.
    Nav { slug: String },
}

/// Command-line argument wrapper for RegisterMode
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ModeArg {
    /// Serial in, serial out
    #[value(name = "siso")]
    Siso,
    /// Serial in, parallel out
    #[value(name = "sipo")]
    Sipo,
    /// Parallel in, serial out
    #[value(name = "piso")]
    Piso,
    /// Parallel in, parallel out
    #[value(name = "pipo")]
    Pipo,
}

impl From<ModeArg> for RegisterMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Siso => RegisterMode::Siso,
            ModeArg::Sipo => RegisterMode::Sipo,
            ModeArg::Piso => RegisterMode::Piso,
            ModeArg::Pipo => RegisterMode::Pipo,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_follow_subcommand() {
        let cli = Cli::try_parse_from(["logic-dojo", "traffic", "--ticks", "5", "--json"]).unwrap();

        assert!(cli.json);
        assert!(matches!(cli.command, Command::Traffic { ticks: 5, live: false }));
    }

    #[test]
    fn negative_signed_value_parses() {
        let cli = Cli::try_parse_from(["logic-dojo", "signed", "-128", "--width", "8"]).unwrap();

        match cli.command {
            Command::Signed { value, width } => {
                assert_eq!(value, "-128");
                assert_eq!(width, Some(8));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn vending_requires_coins() {
        assert!(Cli::try_parse_from(["logic-dojo", "vending"]).is_err());
    }

    #[test]
    fn kmap_minterm_lists_split_on_commas() {
        let cli = Cli::try_parse_from([
            "logic-dojo",
            "kmap",
            "--ones",
            "1,3,7",
            "--dont-care",
            "0,2",
        ])
        .unwrap();

        match cli.command {
            Command::Kmap { ones, dont_care } => {
                assert_eq!(ones, vec![1, 3, 7]);
                assert_eq!(dont_care, vec![0, 2]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn shift_register_mode_names() {
        let cli = Cli::try_parse_from(["logic-dojo", "shift-register", "--mode", "piso"]).unwrap();

        match cli.command {
            Command::ShiftRegister { mode, .. } => {
                assert_eq!(RegisterMode::from(mode), RegisterMode::Piso);
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert!(Cli::try_parse_from(["logic-dojo", "shift-register", "--mode", "fifo"]).is_err());
    }
}
