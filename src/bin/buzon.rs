use anyhow::Result;
use buzon::cli::start;

// Main function
#[tokio::main]
async fn main() -> Result<()> {
    // Start the program
    let action = start()?;

    // Handle the action
    action.execute().await
}
