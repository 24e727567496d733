use proptest::prelude::*;
use snaplink_core::ShortCode;
use snaplink_generator::alias::smart_base;
use snaplink_generator::{AliasError, AliasGenerator, SeqGenerator};
use std::collections::HashSet;

fn aliases() -> AliasGenerator<SeqGenerator> {
    AliasGenerator::new(SeqGenerator::with_prefix("gen"))
}

proptest! {
    #[test]
    fn smart_alias_is_always_a_valid_code(url in ".{0,120}") {
        let code = aliases().smart(&url, |_| false);
        prop_assert!(ShortCode::new(code.as_str()).is_ok());
    }

    #[test]
    fn smart_alias_from_path_is_valid_and_unique(
        segment in "[A-Za-z0-9_ .%-]{1,60}",
        taken_count in 0usize..25,
    ) {
        let url = format!("https://files.example.com/{segment}");
        let aliases = aliases();
        let mut store: HashSet<String> = HashSet::new();

        for _ in 0..=taken_count {
            let code = aliases.smart(&url, |c| store.contains(c));
            prop_assert!(ShortCode::new(code.as_str()).is_ok());
            prop_assert!(store.insert(code.to_string()));
        }
    }

    #[test]
    fn smart_base_never_exceeds_max_length(url in "https?://[a-z.]{1,40}/[A-Za-z0-9_.-]{0,60}") {
        if let Some(base) = smart_base(&url) {
            prop_assert!(!base.is_empty());
            prop_assert!(base.len() <= 20);
        }
    }

    #[test]
    fn custom_alias_accepts_exactly_valid_codes(alias in "\\PC{0,30}") {
        let result = aliases().custom(&alias, |_| false);
        let expected = ShortCode::new(alias.trim());
        match (result, expected) {
            (Ok(code), Ok(valid)) => prop_assert_eq!(code, valid),
            (Err(AliasError::Invalid(_)), Err(_)) => {}
            (other, expected) => prop_assert!(false, "got {:?}, expected {:?}", other, expected),
        }
    }
}
