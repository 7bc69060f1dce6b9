//! Identity Toolkit adapter for email/password accounts.
//!
//! The role claim is read from the account's custom attributes through
//! `accounts:lookup`. A forced refresh first exchanges the refresh token so the
//! lookup is made with a token minted after any recent claim change.

use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::debug;
use zeroize::Zeroizing;

use super::dto::{
    AuthResponseDto, LookupRequestDto, LookupResponseDto, PasswordRequestDto, RefreshResponseDto,
};
use super::http::{HttpFailure, send};
use super::session::{FirebaseSession, SessionHandle};
use crate::domain::ports::{IdentityProvider, IdentityProviderError};
use crate::domain::{Credentials, Identity, UserId};

const ROLE_ATTRIBUTE: &str = "role";

/// [`IdentityProvider`] backed by the Identity Toolkit REST API.
pub struct FirebaseIdentityProvider {
    client: Client,
    accounts: Url,
    secure_token: Url,
    api_key: Zeroizing<String>,
    session: SessionHandle,
}

impl FirebaseIdentityProvider {
    /// Adapter over the given endpoint roots.
    ///
    /// `accounts` is the Identity Toolkit `v1/` root and `secure_token` the
    /// Secure Token `v1/` root.
    pub fn new(
        client: Client,
        accounts: Url,
        secure_token: Url,
        api_key: &str,
        session: SessionHandle,
    ) -> Self {
        Self {
            client,
            accounts,
            secure_token,
            api_key: Zeroizing::new(api_key.to_owned()),
            session,
        }
    }

    fn endpoint(&self, root: &Url, method: &str) -> Result<Url, IdentityProviderError> {
        let mut url = root
            .join(&format!("./{method}"))
            .map_err(|err| IdentityProviderError::decode(format!("bad endpoint: {err}")))?;
        url.query_pairs_mut().append_pair("key", &self.api_key);
        Ok(url)
    }

    async fn password_flow(
        &self,
        method: &str,
        credentials: &Credentials,
    ) -> Result<Identity, IdentityProviderError> {
        let url = self.endpoint(&self.accounts, method)?;
        let body = send(self.client.post(url).json(&PasswordRequestDto {
            email: credentials.email(),
            password: credentials.password(),
            return_secure_token: true,
        }))
        .await
        .map_err(map_failure)?;
        let auth: AuthResponseDto = decode(&body)?;

        let uid = UserId::new(auth.local_id)
            .map_err(|err| IdentityProviderError::decode(err.to_string()))?;
        let email = auth.email.or_else(|| Some(credentials.email().to_owned()));
        let identity = Identity::new(uid, email);
        self.session.replace(Some(FirebaseSession {
            identity: identity.clone(),
            id_token: Zeroizing::new(auth.id_token),
            refresh_token: Zeroizing::new(auth.refresh_token),
            claim: None,
        }));
        Ok(identity)
    }

    async fn refresh_tokens(
        &self,
        identity: &Identity,
        refresh_token: &str,
    ) -> Result<(), IdentityProviderError> {
        let url = self.endpoint(&self.secure_token, "token")?;
        let body = send(self.client.post(url).form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ]))
        .await
        .map_err(|failure| self.expire_on_refusal(failure))?;
        let refreshed: RefreshResponseDto = decode(&body)?;
        if refreshed.user_id != identity.uid.as_ref() {
            return Err(IdentityProviderError::decode(
                "refreshed token belongs to another user",
            ));
        }
        self.session.update_for(identity, |session| {
            session.id_token = Zeroizing::new(refreshed.id_token);
            session.refresh_token = Zeroizing::new(refreshed.refresh_token);
        });
        Ok(())
    }

    async fn lookup_claim(
        &self,
        identity: &Identity,
    ) -> Result<Option<String>, IdentityProviderError> {
        let id_token = self
            .session
            .bearer()
            .ok_or_else(IdentityProviderError::no_session)?;
        let url = self.endpoint(&self.accounts, "accounts:lookup")?;
        let body = send(self.client.post(url).json(&LookupRequestDto {
            id_token: id_token.as_str(),
        }))
        .await
        .map_err(|failure| self.expire_on_refusal(failure))?;
        let lookup: LookupResponseDto = decode(&body)?;
        let user = lookup
            .users
            .into_iter()
            .find(|user| user.local_id == identity.uid.as_ref())
            .ok_or_else(|| IdentityProviderError::decode("lookup returned no matching user"))?;
        role_from_attributes(user.custom_attributes.as_deref())
    }

    /// A refused token exchange means the session can no longer be used.
    fn expire_on_refusal(&self, failure: HttpFailure) -> IdentityProviderError {
        match failure {
            HttpFailure::Refused(message) => {
                debug!(reason = %message, "session expired");
                self.session.replace(None);
                IdentityProviderError::no_session()
            }
            other => map_failure(other),
        }
    }
}

fn map_failure(failure: HttpFailure) -> IdentityProviderError {
    match failure {
        HttpFailure::Refused(message) | HttpFailure::Missing(message) => {
            IdentityProviderError::rejected(message)
        }
        HttpFailure::Unavailable(message) => IdentityProviderError::connection(message),
    }
}

fn decode<T: serde::de::DeserializeOwned>(body: &[u8]) -> Result<T, IdentityProviderError> {
    serde_json::from_slice(body).map_err(|err| {
        IdentityProviderError::decode(format!("invalid Identity Toolkit JSON payload: {err}"))
    })
}

/// Extract the `role` entry from the custom attributes JSON string.
fn role_from_attributes(raw: Option<&str>) -> Result<Option<String>, IdentityProviderError> {
    let Some(raw) = raw.filter(|raw| !raw.trim().is_empty()) else {
        return Ok(None);
    };
    let attributes: serde_json::Map<String, serde_json::Value> = serde_json::from_str(raw)
        .map_err(|err| IdentityProviderError::decode(format!("custom attributes: {err}")))?;
    Ok(attributes
        .get(ROLE_ATTRIBUTE)
        .and_then(serde_json::Value::as_str)
        .map(str::to_owned))
}

#[async_trait]
impl IdentityProvider for FirebaseIdentityProvider {
    async fn sign_in(&self, credentials: &Credentials) -> Result<Identity, IdentityProviderError> {
        self.password_flow("accounts:signInWithPassword", credentials)
            .await
    }

    async fn sign_up(&self, credentials: &Credentials) -> Result<Identity, IdentityProviderError> {
        self.password_flow("accounts:signUp", credentials).await
    }

    async fn sign_out(&self) -> Result<(), IdentityProviderError> {
        self.session.replace(None);
        Ok(())
    }

    fn current_identity(&self) -> Option<Identity> {
        self.session.identity()
    }

    async fn privilege_claim(
        &self,
        identity: &Identity,
        force_refresh: bool,
    ) -> Result<Option<String>, IdentityProviderError> {
        let (refresh_token, cached) = self
            .session
            .snapshot_for(identity)
            .ok_or_else(IdentityProviderError::no_session)?;
        if force_refresh {
            self.refresh_tokens(identity, &refresh_token).await?;
        } else if let Some(claim) = cached {
            return Ok(claim);
        }

        let claim = self.lookup_claim(identity).await?;
        let cached = claim.clone();
        self.session
            .update_for(identity, move |session| session.claim = Some(cached));
        debug!(uid = %identity.uid, claim = ?claim, force_refresh, "role claim looked up");
        Ok(claim)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for non-network helpers.
    use super::*;
    use rstest::rstest;

    fn provider(session: SessionHandle) -> FirebaseIdentityProvider {
        FirebaseIdentityProvider::new(
            Client::new(),
            Url::parse("https://identitytoolkit.googleapis.com/v1/").expect("url"),
            Url::parse("https://securetoken.googleapis.com/v1/").expect("url"),
            "web-key",
            session,
        )
    }

    #[rstest]
    #[case::absent(None, None)]
    #[case::blank(Some("  "), None)]
    #[case::no_role(Some(r#"{"tier":"gold"}"#), None)]
    #[case::team_member(Some(r#"{"role":"team-member"}"#), Some("team-member"))]
    #[case::non_string(Some(r#"{"role":7}"#), None)]
    fn role_is_read_from_custom_attributes(
        #[case] raw: Option<&str>,
        #[case] expected: Option<&str>,
    ) {
        let role = role_from_attributes(raw).expect("attributes parse");
        assert_eq!(role.as_deref(), expected);
    }

    #[test]
    fn malformed_attributes_are_decode_errors() {
        let err = role_from_attributes(Some("{role")).expect_err("malformed");
        assert!(matches!(err, IdentityProviderError::Decode { .. }));
    }

    #[test]
    fn method_endpoints_keep_colon_and_key() {
        let adapter = provider(SessionHandle::new());
        let url = adapter
            .endpoint(&adapter.accounts, "accounts:signInWithPassword")
            .expect("endpoint");
        assert_eq!(
            url.as_str(),
            "https://identitytoolkit.googleapis.com/v1/accounts:signInWithPassword?key=web-key"
        );
    }

    #[rstest]
    #[case::refused(HttpFailure::Refused("INVALID_LOGIN_CREDENTIALS".into()), "Rejected")]
    #[case::missing(HttpFailure::Missing("status 404".into()), "Rejected")]
    #[case::unavailable(HttpFailure::Unavailable("timed out".into()), "Connection")]
    fn failures_map_to_port_errors(#[case] failure: HttpFailure, #[case] expected: &str) {
        let mapped = match map_failure(failure) {
            IdentityProviderError::Rejected { .. } => "Rejected",
            IdentityProviderError::Connection { .. } => "Connection",
            IdentityProviderError::NoSession => "NoSession",
            IdentityProviderError::Decode { .. } => "Decode",
        };
        assert_eq!(mapped, expected);
    }

    #[test]
    fn refused_refresh_drops_the_session() {
        let session = SessionHandle::new();
        session.replace(Some(FirebaseSession {
            identity: Identity::new(UserId::new("u1").expect("uid"), None),
            id_token: Zeroizing::new("id".to_owned()),
            refresh_token: Zeroizing::new("refresh".to_owned()),
            claim: None,
        }));
        let adapter = provider(session.clone());

        let err = adapter.expire_on_refusal(HttpFailure::Refused("TOKEN_EXPIRED".into()));

        assert!(matches!(err, IdentityProviderError::NoSession));
        assert!(session.identity().is_none());
    }

    #[tokio::test]
    async fn claim_requires_matching_session() {
        let adapter = provider(SessionHandle::new());
        let stranger = Identity::new(UserId::new("u9").expect("uid"), None);
        let err = adapter
            .privilege_claim(&stranger, false)
            .await
            .expect_err("no session");
        assert!(matches!(err, IdentityProviderError::NoSession));
    }

    #[tokio::test]
    async fn cached_claim_is_served_without_refresh() {
        let session = SessionHandle::new();
        let identity = Identity::new(UserId::new("u1").expect("uid"), None);
        session.replace(Some(FirebaseSession {
            identity: identity.clone(),
            id_token: Zeroizing::new("id".to_owned()),
            refresh_token: Zeroizing::new("refresh".to_owned()),
            claim: Some(Some("team-member".to_owned())),
        }));
        let adapter = provider(session);

        let claim = adapter
            .privilege_claim(&identity, false)
            .await
            .expect("cached claim");
        assert_eq!(claim.as_deref(), Some("team-member"));
    }
}
