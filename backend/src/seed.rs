//! Demo roster inserted on first start.
//!
//! Seeding runs only against an empty store and never aborts startup: any
//! failure is logged and the server continues with whatever was written.

use tracing::{info, warn};

use crate::domain::ports::UserRepository;
use crate::domain::{DisplayName, EmailAddress, NewUser, Password, PokemonId};

const DEMO_PASSWORD: &str = "default123";

const DEMO_USERS: [(&str, &str, &[i32]); 3] = [
    ("Nicolas", "nicolarro20@gmail.com", &[1, 25, 150]),
    ("Toto", "toto@gmail.com", &[4, 6]),
    ("Carlos", "usuario3@gmail.com", &[7, 9, 131]),
];

/// Outcome of a seeding attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The store already held users; nothing was written.
    Skipped,
    /// This many demo users were created.
    Seeded(usize),
}

fn demo_user(name: &str, email: &str, pokemon_ids: &[i32]) -> Result<NewUser, String> {
    let pokemon_ids = pokemon_ids
        .iter()
        .map(|id| PokemonId::new(*id).map_err(|err| err.to_string()))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(NewUser {
        name: DisplayName::new(name).map_err(|err| err.to_string())?,
        email: EmailAddress::new(email).map_err(|err| err.to_string())?,
        password: Password::new(DEMO_PASSWORD).map_err(|err| err.to_string())?,
        pokemon_ids,
    })
}

/// Insert the demo users when `repo` is empty.
///
/// Returns `None` when the store could not be inspected.
pub async fn seed_demo_users(repo: &dyn UserRepository) -> Option<SeedOutcome> {
    let existing = match repo.list_all().await {
        Ok(users) => users.len(),
        Err(error) => {
            warn!(%error, "skipping demo seed: user store unavailable");
            return None;
        }
    };
    if existing > 0 {
        info!(existing, "user store already populated; skipping demo seed");
        return Some(SeedOutcome::Skipped);
    }

    let mut created = 0;
    for (name, email, pokemon_ids) in DEMO_USERS {
        let user = match demo_user(name, email, pokemon_ids) {
            Ok(user) => user,
            Err(error) => {
                warn!(%error, email, "invalid demo user");
                continue;
            }
        };
        match repo.create(&user).await {
            Ok(stored) => {
                created += 1;
                info!(user_id = %stored.id(), email, "seeded demo user");
            }
            Err(error) => warn!(%error, email, "failed to seed demo user"),
        }
    }
    Some(SeedOutcome::Seeded(created))
}
