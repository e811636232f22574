use anyhow::{anyhow, bail, Context, Result};
use gallery_api::{DragResult, ImageId, ImageRecord, LoginForm, RegisterForm};
use gallery_client::{FileTokenStore, GalleryClient, GalleryConfig};
use gallery_core::{AuthFlow, DeleteOutcome, Gallery, ReorderOutcome, Session};
use std::io::{BufRead, Write};
use std::sync::Arc;

use crate::args::Command;

type Auth = AuthFlow<GalleryClient, FileTokenStore>;

pub async fn run(config: &GalleryConfig, command: Command) -> Result<()> {
    let client = Arc::new(GalleryClient::from_config(config)?);
    let tokens = Arc::new(FileTokenStore::new(&config.token_path));
    let auth = AuthFlow::new(client.clone(), tokens);

    match command {
        Command::Login { email, password } => {
            let session = auth
                .login(&LoginForm { email, password })
                .await
                .map_err(|errors| anyhow!(errors.messages().join("\n")))?;
            let who = session.user().map(|u| u.email.as_str()).unwrap_or("unknown");
            println!("Logged in as {}", who);
        }
        Command::Register {
            email,
            phone,
            password,
        } => {
            auth.register(&RegisterForm {
                email,
                phone,
                password,
            })
            .await
            .map_err(|errors| anyhow!(errors.messages().join("\n")))?;
            println!("Registered. Log in to continue.");
        }
        Command::Logout => {
            auth.logout().await?;
            println!("Logged out");
        }
        Command::List { search } => {
            let gallery = open(&auth, client, config).await?;
            if let Some(query) = search {
                gallery.search(&query);
            }
            print_images(&gallery.visible());
        }
        Command::Reorder { from, to, search } => {
            let gallery = open(&auth, client, config).await?;
            if let Some(query) = search {
                gallery.search(&query);
            }
            match gallery.on_drag_end(DragResult::moved(from, to)).await {
                ReorderOutcome::Persisted => print_images(&gallery.visible()),
                ReorderOutcome::Rejected(e) | ReorderOutcome::Failed(e) => return Err(e.into()),
                other => bail!("Reorder did not complete: {:?}", other),
            }
        }
        Command::Delete { ids, yes } => {
            let gallery = open(&auth, client, config).await?;
            for id in &ids {
                let id = ImageId::new(id.as_str());
                if !gallery.toggle_select(&id) {
                    bail!("No image with id {}", id);
                }
            }
            let prompt = gallery
                .request_delete()
                .context("Nothing selected for deletion")?;
            if !yes && !confirm(&prompt.message)? {
                gallery.dismiss_prompt();
                println!("Nothing deleted");
                return Ok(());
            }
            match gallery.confirm_delete().await {
                DeleteOutcome::Deleted(count) => println!("Deleted {} images", count),
                DeleteOutcome::RolledBack(e) => return Err(e.into()),
                DeleteOutcome::NotConfirmed => bail!("Deletion was not confirmed"),
            }
        }
    }
    Ok(())
}

/// Gallery for the stored session, loaded from the service
async fn open(
    auth: &Auth,
    client: Arc<GalleryClient>,
    config: &GalleryConfig,
) -> Result<Gallery<GalleryClient>> {
    let session: Session = auth
        .restore_session()
        .await
        .context("Not logged in. Run `gallery login <email> <password>` first")?;
    let gallery = Gallery::new(client, session).with_policy(config.sync_policy);
    gallery.refresh().await?;
    Ok(gallery)
}

fn print_images(images: &[ImageRecord]) {
    if images.is_empty() {
        println!("No images");
        return;
    }
    for (index, image) in images.iter().enumerate() {
        println!(
            "{:>3}  {:<26}  {}",
            index,
            image.id,
            image.title.as_deref().unwrap_or("(untitled)")
        );
    }
}

fn confirm(message: &str) -> Result<bool> {
    print!("{} [y/N] ", message);
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}
