use std::io;

use algo_report::config::ReportPaths;
use algo_report::report::setcover;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    setcover::run(&ReportPaths::default(), &mut io::stdout().lock())?;
    Ok(())
}
