//! In-memory port doubles shared by the HTTP journey suites.
//!
//! One [`InMemoryParkStore`] backs the credential, park and visit ports so a
//! visit recorded through the API shows up in the next read, the same way
//! the PostGIS tables behave.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use actix_session::config::CookieContentSecurity;
use actix_session::storage::CookieSessionStore;
use actix_session::SessionMiddleware;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;
use async_trait::async_trait;
use chrono::NaiveDate;
use parkmap::domain::ports::{
    FixtureBoundaryRepository, ParkRepository, ParkRepositoryError, UserCredentialsRepository,
    UserCredentialsRepositoryError, VisitRepository, VisitRepositoryError,
};
use parkmap::domain::{
    Centroid, CredentialsLoginService, NewVisit, ParkId, ParkMapService, ParkStatus,
    ParkVisitInfo, ParkVisitStat, Role, StoredCredentials, StoredPassword, UserId, Username,
    VisitService,
};
use parkmap::inbound::http::state::HttpState;

/// Date stamped on every visit the store records.
pub const VISIT_DATE: (i32, u32, u32) = (2025, 6, 1);

struct Park {
    id: i32,
    name: &'static str,
    centroid: (f64, f64),
}

struct Account {
    id: i32,
    username: &'static str,
    password: StoredPassword,
    role: Role,
}

#[derive(Default)]
struct Ledger {
    visits: HashMap<(i32, i32), NaiveDate>,
}

/// Shared store behind every port double.
#[derive(Clone)]
pub struct InMemoryParkStore {
    parks: Arc<Vec<Park>>,
    accounts: Arc<Vec<Account>>,
    ledger: Arc<Mutex<Ledger>>,
}

impl Default for InMemoryParkStore {
    fn default() -> Self {
        let parks = vec![
            Park {
                id: 3,
                name: "Bundek",
                centroid: (45.787, 15.993),
            },
            Park {
                id: 7,
                name: "Maksimir",
                centroid: (45.829, 16.018),
            },
            Park {
                id: 9,
                name: "Zrinjevac",
                centroid: (45.810, 15.978),
            },
        ];
        let accounts = vec![
            Account {
                id: 1,
                username: "root",
                password: StoredPassword::hashed(b"salt-root", "adminpw").expect("hash"),
                role: Role::Admin,
            },
            Account {
                id: 2,
                username: "ana",
                password: StoredPassword::new("pass1"),
                role: Role::User,
            },
            Account {
                id: 4,
                username: "ivo",
                password: StoredPassword::hashed(b"salt-ivo", "pass2").expect("hash"),
                role: Role::User,
            },
        ];
        Self {
            parks: Arc::new(parks),
            accounts: Arc::new(accounts),
            ledger: Arc::default(),
        }
    }
}

impl InMemoryParkStore {
    /// Seed a visit directly, bypassing the API.
    pub fn seed_visit(&self, user_id: i32, park_id: i32) {
        let mut ledger = self.ledger.lock().expect("ledger lock");
        ledger.visits.insert((user_id, park_id), visit_date());
    }

    /// HTTP state wired to this store through the real domain services.
    pub fn http_state(&self) -> HttpState {
        let store = Arc::new(self.clone());
        HttpState::new(
            Arc::new(CredentialsLoginService::new(store.clone())),
            Arc::new(ParkMapService::new(
                Arc::new(FixtureBoundaryRepository),
                store.clone(),
            )),
            Arc::new(VisitService::new(store)),
        )
    }

    fn visit_count(&self, park_id: i32) -> u64 {
        let ledger = self.ledger.lock().expect("ledger lock");
        let count = ledger
            .visits
            .keys()
            .filter(|(_, park)| *park == park_id)
            .count();
        u64::try_from(count).unwrap_or(u64::MAX)
    }
}

fn visit_date() -> NaiveDate {
    let (year, month, day) = VISIT_DATE;
    NaiveDate::from_ymd_opt(year, month, day).expect("valid visit date")
}

fn query_error(err: impl std::fmt::Display) -> ParkRepositoryError {
    ParkRepositoryError::query(err.to_string())
}

#[async_trait]
impl UserCredentialsRepository for InMemoryParkStore {
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<StoredCredentials>, UserCredentialsRepositoryError> {
        let Some(account) = self
            .accounts
            .iter()
            .find(|account| account.username == username.as_ref())
        else {
            return Ok(None);
        };
        let id = UserId::new(account.id)
            .map_err(|err| UserCredentialsRepositoryError::query(err.to_string()))?;
        Ok(Some(StoredCredentials {
            id,
            username: username.clone(),
            password: account.password.clone(),
            role: account.role,
        }))
    }
}

#[async_trait]
impl ParkRepository for InMemoryParkStore {
    async fn parks_for_user(
        &self,
        user_id: UserId,
        role: Role,
    ) -> Result<Vec<ParkStatus>, ParkRepositoryError> {
        let mut rows = Vec::with_capacity(self.parks.len());
        for park in self.parks.iter() {
            let visit = match role {
                Role::Admin => {
                    let count = i64::try_from(self.visit_count(park.id)).map_err(query_error)?;
                    ParkVisitInfo::admin(count).map_err(query_error)?
                }
                Role::User => {
                    let ledger = self.ledger.lock().expect("ledger lock");
                    ParkVisitInfo::user(ledger.visits.get(&(user_id.get(), park.id)).copied())
                }
            };
            rows.push(ParkStatus {
                id: ParkId::new(park.id).map_err(query_error)?,
                name: park.name.to_owned(),
                centroid: Centroid::new(park.centroid.0, park.centroid.1)
                    .map_err(query_error)?,
                visit,
            });
        }
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    async fn admin_stats(&self) -> Result<Vec<ParkVisitStat>, ParkRepositoryError> {
        let mut stats: Vec<ParkVisitStat> = self
            .parks
            .iter()
            .map(|park| ParkVisitStat {
                park_name: park.name.to_owned(),
                visit_count: self.visit_count(park.id),
            })
            .collect();
        stats.sort_by(|a, b| {
            b.visit_count
                .cmp(&a.visit_count)
                .then_with(|| a.park_name.cmp(&b.park_name))
        });
        Ok(stats)
    }
}

#[async_trait]
impl VisitRepository for InMemoryParkStore {
    async fn record_visit(&self, visit: &NewVisit) -> Result<(), VisitRepositoryError> {
        let park_id = visit.park_id.get();
        if !self.parks.iter().any(|park| park.id == park_id) {
            return Err(VisitRepositoryError::UnknownPark);
        }
        let mut ledger = self.ledger.lock().expect("ledger lock");
        let key = (visit.user_id.get(), park_id);
        if ledger.visits.contains_key(&key) {
            return Err(VisitRepositoryError::DuplicateVisit);
        }
        ledger.visits.insert(key, visit_date());
        Ok(())
    }
}

/// Private cookie session middleware matching the server's settings.
pub fn session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".into())
        .cookie_secure(false)
        .cookie_content_security(CookieContentSecurity::Private)
        .build()
}

/// Extract the session cookie set by `res`.
pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(|cookie| cookie.into_owned())
        .expect("session cookie")
}
