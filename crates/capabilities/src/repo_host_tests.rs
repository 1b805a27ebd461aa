use super::*;

#[tokio::test]
async fn seeded_pr_round_trips() {
    let host = FakeRepoHost::new();
    host.seed_pr("acme/widgets", PullRequest { number: 7, head_sha: "abc123".to_string(), merged: false });

    let pr = host.get_pr("acme/widgets", 7).await.unwrap();
    assert_eq!(pr.head_sha, "abc123");
}

#[tokio::test]
async fn missing_pr_is_not_found() {
    let host = FakeRepoHost::new();
    let err = host.get_pr("acme/widgets", 99).await.unwrap_err();
    assert!(matches!(err, RepoHostError::NotFound(_)));
}

#[tokio::test]
async fn merge_failure_is_reported_once() {
    let host = FakeRepoHost::new();
    host.fail_next_merge();

    let err = host.merge_pr("acme/widgets", 7, MergeMethod::Squash).await.unwrap_err();
    assert!(matches!(err, RepoHostError::Conflict(_)));

    let result = host.merge_pr("acme/widgets", 7, MergeMethod::Squash).await.unwrap();
    assert_eq!(result.sha, "merged-7");
    assert_eq!(host.merges(), vec![("acme/widgets".to_string(), 7)]);
}
