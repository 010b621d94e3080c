use galaxy_client::{
    game::{score_explanation, RiskZone},
    validate::parse_prediction,
    Agent, GalaxyClient, ValidationRun,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let username = std::env::var("GALAXY_USERNAME")?;
    let password = std::env::var("GALAXY_PASSWORD")?;
    let agent: Agent = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "ddqn".to_owned())
        .parse()
        .map_err(anyhow::Error::msg)?;
    let prediction = std::env::args()
        .nth(2)
        .as_deref()
        .and_then(parse_prediction)
        .ok_or_else(|| anyhow::anyhow!("prediction must be a number between 0 and 120"))?;

    let api = GalaxyClient::from_env()?;
    api.login(&username, &password, false).await?;

    println!("{}", RiskZone::for_prediction(prediction).message());

    let run: ValidationRun = api.run_validation(agent, prediction).await?.decode()?;
    println!(
        "{} ({} points)",
        score_explanation(prediction, run.steps, run.succeeded),
        run.score
    );
    if let Some(gif_url) = run.gif_url {
        println!("replay: {}{gif_url}", api.base_url());
    }

    Ok(())
}
