use anyhow::{Result, bail};
use clap::{Args, ValueEnum};
use hexfind::{CancelToken, Direction, FindMode, FindOutcome, FloatWidth, IntWidth};
use std::path::PathBuf;
use utils::MappedSource;

#[derive(Clone, Copy, ValueEnum)]
pub enum ModeArg {
    Text,
    Hex,
    Int,
    Float,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum DirectionArg {
    Forward,
    Backward,
    All,
}

#[derive(Args)]
pub struct FindArgs {
    /// Input file (searched as raw bytes)
    pub input: PathBuf,
    /// Pattern, interpreted according to --mode
    pub pattern: String,
    /// Pattern interpretation
    #[arg(short, long, value_enum, default_value = "text")]
    pub mode: ModeArg,
    /// Case-insensitive text matching
    #[arg(short, long)]
    pub ignore_case: bool,
    /// Scan direction; 'all' wraps past end-of-file once
    #[arg(short, long, value_enum, default_value = "forward")]
    pub direction: DirectionArg,
    /// Cursor offset the scan starts from
    #[arg(short, long, default_value_t = 0)]
    pub start: u64,
    /// Integer encoding width in bytes
    #[arg(short, long, default_value_t = 4)]
    pub width: u8,
    /// Encode float patterns as 8-byte doubles
    #[arg(long = "f64")]
    pub double: bool,
    /// List every non-overlapping match instead of the first
    #[arg(long)]
    pub all_matches: bool,
}

fn find_mode(args: &FindArgs) -> Result<FindMode> {
    Ok(match args.mode {
        ModeArg::Text => FindMode::Text,
        ModeArg::Hex => FindMode::Hex,
        ModeArg::Int => {
            let width = match args.width {
                1 => IntWidth::W1,
                2 => IntWidth::W2,
                4 => IntWidth::W4,
                8 => IntWidth::W8,
                other => bail!("unsupported integer width {}, expected 1, 2, 4 or 8", other),
            };
            FindMode::Int { width }
        }
        ModeArg::Float => FindMode::Float {
            width: if args.double {
                FloatWidth::F64
            } else {
                FloatWidth::F32
            },
        },
    })
}

pub fn handle(args: FindArgs) -> Result<()> {
    let source = MappedSource::open(&args.input)?;
    let mode = find_mode(&args)?;
    let pattern = hexfind::compile(&args.pattern, mode)?;
    tracing::debug!(pattern_len = pattern.len(), "compiled search pattern");
    let case_sensitive = !args.ignore_case;
    let cancel = CancelToken::new();

    if args.all_matches {
        let mut count = 0usize;
        for offset in hexfind::find_all(&source, &pattern, case_sensitive, &cancel) {
            println!("{:#010x}  ({})", offset, offset);
            count += 1;
        }
        if count == 0 {
            println!("Cannot find '{}'", args.pattern);
        } else {
            println!("{} matches", count);
        }
        return Ok(());
    }

    let direction = match args.direction {
        DirectionArg::Forward => Direction::Forward,
        DirectionArg::Backward => Direction::Backward,
        DirectionArg::All => Direction::All,
    };
    match hexfind::find(
        &source,
        &pattern,
        direction,
        args.start,
        case_sensitive,
        &cancel,
    ) {
        FindOutcome::Found(offset) => println!("{:#010x}  ({})", offset, offset),
        FindOutcome::NotFound => println!("Cannot find '{}'", args.pattern),
        FindOutcome::Cancelled => println!("Search cancelled"),
    }
    Ok(())
}
