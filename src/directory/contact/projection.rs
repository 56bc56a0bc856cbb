//! 列表投影：根据收藏过滤与搜索条件计算要展示的用户
//!
//! 纯函数，不修改输入，每次状态变化都可以重新计算。

use crate::directory::contact::models::{FavoriteSet, User};
use serde::Serialize;

/// 计算展示列表
///
/// 依次应用：仅看收藏过滤；去除首尾空白后的搜索词对 name/email 做不区分大小写的子串匹配。
/// 保持原有相对顺序。
pub fn project<'a>(
    users: &'a [User],
    favorites: &FavoriteSet,
    show_favorites_only: bool,
    search_query: &str,
) -> Vec<&'a User> {
    let query = search_query.trim().to_lowercase();
    users
        .iter()
        .filter(|u| !show_favorites_only || favorites.contains(u.id))
        .filter(|u| {
            query.is_empty()
                || u.name.to_lowercase().contains(&query)
                || u.email.to_lowercase().contains(&query)
        })
        .collect()
}

/// 列表为空时的原因，用于选择空状态提示
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EmptyReason {
    NoFavorites,
    NoMatches,
    NoContacts,
}

impl EmptyReason {
    pub fn message(self) -> &'static str {
        match self {
            Self::NoFavorites => "暂无收藏",
            Self::NoMatches => "没有匹配的联系人",
            Self::NoContacts => "暂无联系人",
        }
    }
}

/// 列表统计
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryStats {
    pub favorite_count: usize,
    pub total_count: usize,
    pub displayed_count: usize,
    pub show_favorites_only: bool,
}

pub fn stats(
    users: &[User],
    favorites: &FavoriteSet,
    show_favorites_only: bool,
    search_query: &str,
) -> DirectoryStats {
    DirectoryStats {
        favorite_count: favorites.len(),
        total_count: users.len(),
        displayed_count: project(users, favorites, show_favorites_only, search_query).len(),
        show_favorites_only,
    }
}

/// 展示列表为空时返回原因，否则 None
pub fn empty_reason(
    users: &[User],
    favorites: &FavoriteSet,
    show_favorites_only: bool,
    search_query: &str,
) -> Option<EmptyReason> {
    if !project(users, favorites, show_favorites_only, search_query).is_empty() {
        return None;
    }
    Some(if show_favorites_only {
        EmptyReason::NoFavorites
    } else if !search_query.trim().is_empty() {
        EmptyReason::NoMatches
    } else {
        EmptyReason::NoContacts
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: i64, name: &str, email: &str) -> User {
        User {
            id,
            name: name.to_string(),
            email: email.to_string(),
        }
    }

    fn sample() -> Vec<User> {
        vec![
            user(1, "Ana", "ana@x.com"),
            user(2, "Bob", "bob@x.com"),
            user(3, "Clementine Bauch", "Nathan@yesenia.net"),
            user(4, "Dana", "dana@x.com"),
        ]
    }

    fn ids(users: Vec<&User>) -> Vec<i64> {
        users.into_iter().map(|u| u.id).collect()
    }

    #[test]
    fn no_filters_is_identity() {
        let users = sample();
        for favorites in [FavoriteSet::new(), [2, 99].into_iter().collect()] {
            let shown = project(&users, &favorites, false, "");
            assert_eq!(shown.into_iter().cloned().collect::<Vec<_>>(), users);
            assert_eq!(project(&users, &favorites, false, "   ").len(), users.len());
        }
    }

    #[test]
    fn favorites_only_keeps_favorites() {
        let users = vec![user(1, "A", "a@x"), user(2, "B", "b@x")];
        let favorites: FavoriteSet = [1].into_iter().collect();
        assert_eq!(ids(project(&users, &favorites, true, "")), vec![1]);
    }

    #[test]
    fn favorites_only_is_restricted_subset() {
        let users = sample();
        let favorites: FavoriteSet = [1, 3, 42].into_iter().collect();
        for query in ["", "a", "X.COM", "zzz"] {
            let all = ids(project(&users, &favorites, false, query));
            let favs = ids(project(&users, &favorites, true, query));
            let expected: Vec<i64> = all.into_iter().filter(|id| favorites.contains(*id)).collect();
            assert_eq!(favs, expected);
        }
    }

    #[test]
    fn search_matches_name_case_insensitively() {
        let users = vec![user(1, "Ana", ""), user(2, "Bob", "")];
        let shown = project(&users, &FavoriteSet::new(), false, "an");
        assert_eq!(ids(shown), vec![1]);
    }

    #[test]
    fn search_matches_email_and_trims() {
        let users = sample();
        let shown = project(&users, &FavoriteSet::new(), false, "  YESENIA ");
        assert_eq!(ids(shown), vec![3]);
    }

    #[test]
    fn stale_favorite_ids_never_render() {
        let users = sample();
        let favorites: FavoriteSet = [99, 100].into_iter().collect();
        assert!(project(&users, &favorites, true, "").is_empty());
        assert_eq!(
            empty_reason(&users, &favorites, true, ""),
            Some(EmptyReason::NoFavorites)
        );
    }

    #[test]
    fn stats_and_empty_reason() {
        let users = sample();
        let favorites: FavoriteSet = [2, 4].into_iter().collect();

        assert_eq!(
            stats(&users, &favorites, true, "dana"),
            DirectoryStats {
                favorite_count: 2,
                total_count: 4,
                displayed_count: 1,
                show_favorites_only: true,
            }
        );
        assert_eq!(empty_reason(&users, &favorites, false, ""), None);
        assert_eq!(
            empty_reason(&users, &favorites, false, "nobody"),
            Some(EmptyReason::NoMatches)
        );
        assert_eq!(
            empty_reason(&[], &favorites, false, ""),
            Some(EmptyReason::NoContacts)
        );
    }
}
