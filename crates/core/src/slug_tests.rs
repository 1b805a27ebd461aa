use super::*;

#[test]
fn punctuation_collapses_to_single_hyphens() {
    assert_eq!(slugify("Feat: Add @mentions!", 40), "feat-add-mentions");
}

#[test]
fn truncates_at_max_len() {
    let title: String = std::iter::repeat('a').take(200).collect();
    let slug = slugify(&title, 40);
    assert_eq!(slug.len(), 40);
}

#[test]
fn leading_and_trailing_punctuation_is_stripped() {
    assert_eq!(slugify("  --Hello World--  ", 40), "hello-world");
}

#[test]
fn empty_input_yields_empty_slug() {
    assert_eq!(slugify("!!!", 40), "");
}

#[test]
fn branch_name_is_prefixed() {
    assert_eq!(branch_name_for("Feat: Add @mentions!"), "proposals/feat-add-mentions");
}
