use galaxy_client::{
    export::{export_filename_today, games_csv, users_csv},
    GalaxyClient, GamePage, UserPage,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let username = std::env::var("GALAXY_USERNAME")?;
    let password = std::env::var("GALAXY_PASSWORD")?;

    let api = GalaxyClient::from_env()?;
    api.login(&username, &password, false).await?;

    let users: UserPage = api.users(1, 10_000, "").await?.decode()?;
    let path = export_filename_today("users");
    std::fs::write(&path, users_csv(&users.users))?;
    println!("wrote {} users to {path}", users.users.len());

    let games: GamePage = api.games(1, 10_000).await?.decode()?;
    let path = export_filename_today("games");
    std::fs::write(&path, games_csv(&games.games))?;
    println!("wrote {} games to {path}", games.games.len());

    Ok(())
}
