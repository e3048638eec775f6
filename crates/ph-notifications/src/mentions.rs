//! `@Name` mentions in comment text

use ph_core::traits::Id;

/// Users mentioned in `text`, in the order of `candidates`.
///
/// A candidate is mentioned when `@` followed by their full name appears in
/// the text (case-insensitive) and is not directly followed by another
/// letter or digit, so `@Ann` does not match `@Anna`.
pub fn extract_mentions<'a, I>(text: &str, candidates: I) -> Vec<Id>
where
    I: IntoIterator<Item = (Id, &'a str)>,
{
    let haystack = text.to_lowercase();
    let mut found = Vec::new();

    for (id, name) in candidates {
        let name = name.trim();
        if name.is_empty() || found.contains(&id) {
            continue;
        }
        let needle = format!("@{}", name.to_lowercase());
        let mentioned = haystack.match_indices(&needle).any(|(start, matched)| {
            haystack[start + matched.len()..]
                .chars()
                .next()
                .map_or(true, |c| !c.is_alphanumeric())
        });
        if mentioned {
            found.push(id);
        }
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use ph_core::traits::new_id;

    #[test]
    fn test_full_names_match() {
        let ada = new_id();
        let grace = new_id();
        let found = extract_mentions(
            "Thanks @ada lovelace, can @Grace Hopper review?",
            vec![(ada, "Ada Lovelace"), (grace, "Grace Hopper")],
        );
        assert_eq!(found, vec![ada, grace]);
    }

    #[test]
    fn test_prefix_of_longer_name_does_not_match() {
        let ann = new_id();
        let found = extract_mentions("ping @Anna", vec![(ann, "Ann")]);
        assert!(found.is_empty());

        let found = extract_mentions("ping @Ann, please", vec![(ann, "Ann")]);
        assert_eq!(found, vec![ann]);
    }

    #[test]
    fn test_no_at_sign_no_mention() {
        let ada = new_id();
        assert!(extract_mentions("Ada will do it", vec![(ada, "Ada")]).is_empty());
        assert!(extract_mentions("@", vec![(ada, "")]).is_empty());
    }
}
