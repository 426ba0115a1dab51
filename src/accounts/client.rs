use tracing::{debug, info, instrument, warn};

use crate::{
    accounts::{IdentityProvider, SignUp, UserStore, Verification},
    error::{AuthorizationError, SignUpError, StoreError},
    identity::Identity,
    users::{MinimalUser, ResolvedUser, Role, UserRecord, UserSummary},
};

/// Signs users up and resolves session tokens to user records.
///
/// Built from the top-level client with
/// [`Client::accounts`](crate::Client::accounts), or from any
/// [`IdentityProvider`] and [`UserStore`].
#[derive(Debug, Clone)]
pub struct Accounts<P, S> {
    provider: P,
    store: S,
}

impl<P, S> Accounts<P, S>
where
    P: IdentityProvider,
    S: UserStore,
{
    pub fn new(provider: P, store: S) -> Self {
        Self { provider, store }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Creates a confirmed identity and its user record.
    ///
    /// # Errors
    /// If the request is invalid, the identity can't be created, or the user
    /// record can't be written. In the last case the identity is deleted
    /// again before returning.
    #[instrument(skip(self, req), fields(email = %req.email, role = %req.role))]
    pub async fn sign_up(&self, req: &SignUp) -> Result<UserSummary, SignUpError> {
        req.validate()?;

        let identity = self
            .provider
            .create_user(&req.to_identity())
            .await
            .map_err(SignUpError::Provider)?;

        let email = if identity.email.is_empty() {
            req.email.trim().to_string()
        } else {
            identity.email.clone()
        };
        let record = UserRecord {
            id: identity.id.clone(),
            name: req.name.trim().to_string(),
            email,
            phone: req.phone.clone(),
            role: req.role,
            active: true,
            created_at: None,
        };

        match self.store.insert_user(&record).await {
            Ok(stored) => {
                info!(id = %stored.id, "signed up user");
                Ok(UserSummary::from(&stored))
            }
            Err(source) => {
                warn!(id = %identity.id, error = %source, "failed to create user record, removing identity");
                let orphaned_identity = match self.provider.delete_user(&identity.id).await {
                    Ok(()) => None,
                    Err(e) => {
                        warn!(id = %identity.id, error = %e, "failed to remove identity, it is orphaned");
                        Some(identity.id)
                    }
                };
                Err(SignUpError::Store {
                    source,
                    orphaned_identity,
                })
            }
        }
    }

    /// Verifies a session token and resolves the user behind it, creating
    /// the user record if it doesn't exist yet.
    ///
    /// A missing or blank token is unauthenticated without any request being
    /// made. Once the token is valid this never fails: if the user record
    /// can't be read or written the result is a
    /// [`ResolvedUser::Minimal`] built from the identity.
    #[instrument(skip_all)]
    pub async fn verify(&self, token: Option<&str>) -> Verification {
        let token = match token.map(str::trim).filter(|t| !t.is_empty()) {
            Some(token) => token,
            None => return Verification::Unauthenticated,
        };

        let identity = match self.provider.validate_token(token).await {
            Ok(identity) => identity,
            Err(e) => {
                debug!(error = %e, "session token rejected");
                return Verification::Unauthenticated;
            }
        };

        Verification::Authenticated(self.resolve(&identity).await)
    }

    /// Like [`verify`](Self::verify), but fails unless the token is valid.
    ///
    /// # Errors
    /// [`AuthorizationError::Unauthenticated`] if there is no valid session.
    pub async fn require_user(
        &self,
        token: Option<&str>,
    ) -> Result<ResolvedUser, AuthorizationError> {
        self.verify(token)
            .await
            .into_user()
            .ok_or(AuthorizationError::Unauthenticated)
    }

    #[instrument(skip_all, fields(id = %identity.id))]
    async fn resolve(&self, identity: &Identity) -> ResolvedUser {
        match self.store.find_user_by_id(&identity.id).await {
            Ok(Some(record)) => ResolvedUser::Record(record),
            Ok(None) => self.provision(identity).await,
            Err(e) => {
                warn!(error = %e, "failed to look up user record");
                ResolvedUser::Minimal(MinimalUser::from(identity))
            }
        }
    }

    /// Finds or creates the record for an identity that has none under its
    /// id. Concurrent calls for the same identity converge on one record: the
    /// loser of the insert race gets a conflict and reads the winner's row.
    async fn provision(&self, identity: &Identity) -> ResolvedUser {
        let degraded = || ResolvedUser::Minimal(MinimalUser::from(identity));

        if identity.email.is_empty() {
            warn!("identity has no email, can't provision a user record");
            return degraded();
        }

        // The record may exist under another id, e.g. when it was created by
        // hand before the identity.
        match self.store.find_user_by_email(&identity.email).await {
            Ok(Some(record)) => {
                debug!(record_id = %record.id, "found user record by email");
                return ResolvedUser::Record(record);
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "failed to look up user record by email"),
        }

        let record = record_for(identity);
        match self.store.insert_user(&record).await {
            Ok(stored) => {
                info!(role = %stored.role, "provisioned user record");
                ResolvedUser::Record(stored)
            }
            Err(StoreError::Conflict(e)) => {
                debug!(error = %e, "user record created concurrently, reading it back");
                match self.store.find_user_by_email(&identity.email).await {
                    Ok(Some(record)) => ResolvedUser::Record(record),
                    Ok(None) => {
                        warn!("conflicting user record not found by email");
                        degraded()
                    }
                    Err(e) => {
                        warn!(error = %e, "failed to read back conflicting user record");
                        degraded()
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "failed to provision user record");
                degraded()
            }
        }
    }
}

/// Builds the record for an identity that validated without one. Identities
/// without a role are administrator bootstrap accounts.
fn record_for(identity: &Identity) -> UserRecord {
    let metadata = &identity.user_metadata;
    let role = match metadata.role.as_deref() {
        None => Role::Admin,
        Some(role) => role.parse().unwrap_or_else(|e| {
            warn!(error = %e, "falling back to customer role");
            Role::Customer
        }),
    };
    let name = metadata.name.clone().unwrap_or_else(|| {
        identity
            .email
            .split('@')
            .next()
            .unwrap_or_default()
            .to_string()
    });

    UserRecord {
        id: identity.id.clone(),
        name,
        email: identity.email.clone(),
        phone: metadata.phone.clone(),
        role,
        active: true,
        created_at: None,
    }
}
