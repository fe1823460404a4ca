use anyhow::Result;

fn main() -> Result<()> {
    purview::run()?;
    Ok(())
}
