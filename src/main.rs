//! # CCITT fax tool
#![warn(missing_docs)]

mod cli;

use cli::opt::{Command, Options};
use color_eyre::eyre;

fn main() -> eyre::Result<()> {
    let opt: Options = cli::init()?;
    match opt.command {
        Command::Decode(opt) => cli::decode::run(opt),
        Command::Encode(opt) => cli::encode::run(opt),
    }
}
