//! Sign-in command and the session setup shared with `sync`.

use anyhow::Context;
use std::io::{self, BufRead, Write};
use tokio::runtime::Runtime;

use crate::catalog::Session;
use crate::catalog::spotify::{AuthClient, OAuthConfig, TokenCache};
use crate::config::{self, Config, Credentials};

/// Run the authorization flow and cache the token
pub fn cmd_login(rt: &Runtime, config: &Config, credentials: &Credentials) -> anyhow::Result<()> {
    let oauth = credentials.clone().or(&config.credentials).validate()?;

    rt.block_on(async {
        let session = establish_session(&oauth).await?;
        let user = session.user();
        println!(
            "Signed in as {} ({})",
            user.display_name.as_deref().unwrap_or(&user.id),
            user.id
        );
        if let Some(path) = config::token_path() {
            println!("Token cached at {}", path.display());
        }
        Ok(())
    })
}

/// Build the session from cached or freshly authorized credentials
pub(crate) async fn establish_session(oauth: &OAuthConfig) -> anyhow::Result<Session> {
    let token_path =
        config::token_path().context("Could not determine config directory for token cache")?;
    let auth_client = AuthClient::new()?;

    Session::establish(oauth, &auth_client, &TokenCache::new(token_path), |url| {
        let stdin = io::stdin();
        prompt_for_redirect(url, &mut stdin.lock(), &mut io::stdout())
    })
    .await
    .context("Could not sign in to Spotify")
}

/// Show the consent URL and read back the redirected URL
pub(crate) fn prompt_for_redirect<R: BufRead, W: Write>(
    url: &str,
    input: &mut R,
    output: &mut W,
) -> io::Result<String> {
    writeln!(output, "Open this URL in your browser and approve access:")?;
    writeln!(output)?;
    writeln!(output, "  {}", url)?;
    writeln!(output)?;
    write!(output, "Paste the URL you were redirected to: ")?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "no redirected URL entered",
        ));
    }
    Ok(line.trim().to_string())
}
