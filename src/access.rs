use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::Visibility;

/// Which of another user's entries a viewer may read.
///
/// An owner always sees everything they wrote. Everyone else sees
/// public entries, plus circle-shared entries when the two users share
/// at least one circle. Private entries never leave their owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadScope {
    /// Viewer is the owner; no visibility restriction.
    Owner,
    /// Viewer is someone else; `circle_shared` widens the scope to
    /// circle-shared entries.
    Shared { circle_shared: bool },
}

impl ReadScope {
    /// Pure scope resolution. `shares_circle` is only consulted when the
    /// viewer is not the owner.
    pub fn resolve(viewer_id: Uuid, owner_id: Uuid, shares_circle: bool) -> ReadScope {
        if viewer_id == owner_id {
            ReadScope::Owner
        } else {
            ReadScope::Shared {
                circle_shared: shares_circle,
            }
        }
    }

    pub fn allows(self, visibility: Visibility) -> bool {
        match self {
            ReadScope::Owner => true,
            ReadScope::Shared { circle_shared } => match visibility {
                Visibility::Public => true,
                Visibility::Circles => circle_shared,
                Visibility::Private => false,
            },
        }
    }

    /// SQL fragment appended to an owner-filtered query. When no circle
    /// is shared the circles clause is omitted from the query entirely
    /// rather than matched against; the result set is identical either
    /// way.
    pub fn sql_clause(self) -> &'static str {
        match self {
            ReadScope::Owner => "",
            ReadScope::Shared {
                circle_shared: false,
            } => " AND visibility = 'public'",
            ReadScope::Shared {
                circle_shared: true,
            } => " AND visibility IN ('public', 'circles')",
        }
    }
}

/// Select statement for a user's journal entries under the given scope,
/// newest first. `$1` binds the owner id.
pub fn journal_select(scope: ReadScope) -> String {
    format!(
        "SELECT id, owner_id, title, content, visibility, created_at \
         FROM journals WHERE owner_id = $1{} ORDER BY created_at DESC",
        scope.sql_clause()
    )
}

/// Same shape for mood history; moods carry the same visibility tags.
pub fn mood_select(scope: ReadScope) -> String {
    format!(
        "SELECT id, owner_id, mood, visibility, created_at \
         FROM moods WHERE owner_id = $1{} ORDER BY created_at DESC",
        scope.sql_clause()
    )
}

/// Answers "do these two users share at least one circle?". Behind a
/// trait so the membership store can be swapped without touching the
/// scope rule.
pub trait CircleMembership {
    async fn shares_circle(&self, a: Uuid, b: Uuid) -> Result<bool, sqlx::Error>;
}

impl CircleMembership for PgPool {
    async fn shares_circle(&self, a: Uuid, b: Uuid) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS (
                 SELECT 1 FROM circle_members x
                 JOIN circle_members y ON x.circle_id = y.circle_id
                 WHERE x.user_id = $1 AND y.user_id = $2
             )",
        )
        .bind(a)
        .bind(b)
        .fetch_one(self)
        .await
    }
}

/// Resolve the scope a viewer gets on an owner's entries. The membership
/// lookup is skipped when the viewer is the owner.
pub async fn scope_for<M: CircleMembership>(
    membership: &M,
    viewer_id: Uuid,
    owner_id: Uuid,
) -> Result<ReadScope, sqlx::Error> {
    if viewer_id == owner_id {
        return Ok(ReadScope::Owner);
    }
    let shared = membership.shares_circle(viewer_id, owner_id).await?;
    Ok(ReadScope::resolve(viewer_id, owner_id, shared))
}

/// Mutation guard: only the stored owner may act on an entry. A mismatch
/// is an authorization failure, distinct from not-found.
pub fn authorize_owner(entry_owner: Uuid, requester: Uuid) -> Result<(), ApiError> {
    if entry_owner == requester {
        Ok(())
    } else {
        Err(ApiError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids() -> (Uuid, Uuid) {
        (Uuid::new_v4(), Uuid::new_v4())
    }

    #[test]
    fn owner_sees_everything() {
        let (a, _) = ids();
        let scope = ReadScope::resolve(a, a, false);
        assert_eq!(scope, ReadScope::Owner);
        for v in [Visibility::Private, Visibility::Circles, Visibility::Public] {
            assert!(scope.allows(v));
        }
        // The shares_circle flag is irrelevant for the owner.
        assert_eq!(ReadScope::resolve(a, a, true), ReadScope::Owner);
    }

    #[test]
    fn stranger_sees_public_only() {
        let (a, b) = ids();
        let scope = ReadScope::resolve(a, b, false);
        assert!(scope.allows(Visibility::Public));
        assert!(!scope.allows(Visibility::Circles));
        assert!(!scope.allows(Visibility::Private));
    }

    #[test]
    fn circle_mate_sees_public_and_circles() {
        let (a, b) = ids();
        let scope = ReadScope::resolve(a, b, true);
        assert!(scope.allows(Visibility::Public));
        assert!(scope.allows(Visibility::Circles));
        assert!(!scope.allows(Visibility::Private));
    }

    #[test]
    fn circles_clause_is_omitted_when_unshared() {
        let scope = ReadScope::Shared {
            circle_shared: false,
        };
        assert_eq!(scope.sql_clause(), " AND visibility = 'public'");
        assert!(!journal_select(scope).contains("circles"));
        assert!(!mood_select(scope).contains("circles"));
    }

    #[test]
    fn shared_clause_admits_both_tags() {
        let scope = ReadScope::Shared {
            circle_shared: true,
        };
        assert_eq!(scope.sql_clause(), " AND visibility IN ('public', 'circles')");
    }

    #[test]
    fn owner_query_is_unrestricted() {
        let sql = journal_select(ReadScope::Owner);
        assert_eq!(
            sql,
            "SELECT id, owner_id, title, content, visibility, created_at \
             FROM journals WHERE owner_id = $1 ORDER BY created_at DESC"
        );
    }

    #[test]
    fn resolution_is_deterministic() {
        let (a, b) = ids();
        assert_eq!(
            ReadScope::resolve(a, b, true),
            ReadScope::resolve(a, b, true)
        );
        assert_eq!(
            journal_select(ReadScope::resolve(a, b, false)),
            journal_select(ReadScope::resolve(a, b, false))
        );
    }

    // Owner A has {public, circles, private}. A stranger sees only the
    // public entry; a circle mate additionally sees the shared one; the
    // private entry stays hidden for both.
    #[test]
    fn worked_example() {
        let (a, b) = ids();
        let entries = [Visibility::Public, Visibility::Circles, Visibility::Private];

        let visible = |scope: ReadScope| -> Vec<Visibility> {
            entries.iter().copied().filter(|v| scope.allows(*v)).collect()
        };

        assert_eq!(visible(ReadScope::resolve(b, a, false)), vec![Visibility::Public]);
        assert_eq!(
            visible(ReadScope::resolve(b, a, true)),
            vec![Visibility::Public, Visibility::Circles]
        );
        assert_eq!(visible(ReadScope::resolve(a, a, false)), entries.to_vec());
    }

    #[test]
    fn owner_may_delete_own_entry() {
        let (a, b) = ids();
        assert!(authorize_owner(a, a).is_ok());
        assert!(matches!(
            authorize_owner(a, b),
            Err(ApiError::Unauthorized)
        ));
    }

    struct StubCircles(bool);

    impl CircleMembership for StubCircles {
        async fn shares_circle(&self, _a: Uuid, _b: Uuid) -> Result<bool, sqlx::Error> {
            Ok(self.0)
        }
    }

    #[tokio::test]
    async fn scope_for_skips_lookup_for_owner() {
        let (a, b) = ids();
        // Even a membership source claiming "shared" cannot influence an
        // owner read.
        let scope = scope_for(&StubCircles(true), a, a).await.unwrap();
        assert_eq!(scope, ReadScope::Owner);

        let scope = scope_for(&StubCircles(true), a, b).await.unwrap();
        assert_eq!(scope, ReadScope::Shared { circle_shared: true });

        let scope = scope_for(&StubCircles(false), a, b).await.unwrap();
        assert_eq!(scope, ReadScope::Shared { circle_shared: false });
    }
}
