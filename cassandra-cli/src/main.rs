use anyhow::Result;
use cassandra_cli::CassandraPlan;
use structopt::StructOpt;

fn main() -> Result<()> {
    CassandraPlan::from_args().run()
}
