use pretty_assertions::assert_eq;
use rxnfinder_core::{ReactionOutcome, RxnFinderError};
use rxnfinder_pipeline::{normalize_reactions, BatchOrchestrator, SearchSettings};
use rxnfinder_relation::{QueryResponse, RetryPolicy};
use rxnfinder_test::{
    gene, init_test_logging, tabular_row, traversal_response, write_proteome, MockAligner,
    ScriptedRelationClient,
};
use std::time::Duration;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

fn settings(max_concurrent: usize) -> SearchSettings {
    SearchSettings {
        max_concurrent_reactions: max_concurrent,
        alignment_timeout: Some(Duration::from_secs(5)),
        ..SearchSettings::default()
    }
}

fn orchestrator(
    client: ScriptedRelationClient,
    aligner: MockAligner,
    settings: SearchSettings,
    work: &TempDir,
) -> BatchOrchestrator<ScriptedRelationClient, MockAligner> {
    BatchOrchestrator::new(client, aligner, settings)
        .with_retry_policy(RetryPolicy::immediate(2))
        .with_work_root(work.path().join("work"))
}

fn ids(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn test_order_is_input_order_not_completion_order() {
    init_test_logging();
    let work = TempDir::new().unwrap();
    let proteome = write_proteome(work.path());

    let client = ScriptedRelationClient::new()
        .respond("r1", traversal_response("r1", &[gene("g1", "MKTAYIAK")]))
        .respond("r2", QueryResponse::with_results(vec![]))
        .respond("r3", traversal_response("r3", &[gene("g3", "MSLEQKKG")]));
    let aligner = MockAligner::new()
        .with_output("r1", tabular_row("g1", "qg_0001", 120.0))
        .with_delay("r1", Duration::from_millis(200))
        .with_output("r3", tabular_row("g3", "qg_0002", 90.0));

    let orch = orchestrator(client, aligner, settings(3), &work);
    let batch = orch
        .run(&ids(&["r1", "r2", "r3"]), &proteome, &CancellationToken::new())
        .await
        .unwrap();

    let order: Vec<_> = batch.iter().map(|h| h.reaction_id.as_str()).collect();
    assert_eq!(order, vec!["r1", "r2", "r3"]);

    // r1 finished last but stays first; r2 never reached the aligner
    assert_eq!(orch.aligner().call_count(), 2);
    assert_eq!(batch.gene_hits[0].ranked_hits[0].target_gene(), "qg_0001");
    assert_eq!(batch.gene_hits[1].outcome, ReactionOutcome::NoCandidates);
    assert!(batch.gene_hits[1].ranked_hits.is_empty());
    assert_eq!(batch.gene_hits[2].ranked_hits[0].bit_score(), 90.0);
}

#[tokio::test]
async fn test_no_candidates_then_hits() {
    let work = TempDir::new().unwrap();
    let proteome = write_proteome(work.path());

    let client = ScriptedRelationClient::new()
        .respond("r1", QueryResponse::with_results(vec![]))
        .respond("r2", traversal_response("r2", &[gene("gA", "MKT"), gene("gB", "MSL")]));
    let rows = [
        tabular_row("gA", "qg_0001", 80.0),
        tabular_row("gB", "qg_0001", 95.0),
        tabular_row("gA", "qg_0002", 60.0),
        tabular_row("gB", "qg_0002", 12.0),
    ]
    .concat();
    let aligner = MockAligner::new().with_output("r2", rows);

    let orch = orchestrator(client, aligner, settings(2), &work);
    let batch = orch
        .run(&ids(&["r1", "r2"]), &proteome, &CancellationToken::new())
        .await
        .unwrap();

    let pairs = batch.pairs();
    assert_eq!(pairs.len(), 2);
    assert_eq!(pairs[0], ("r1", &[][..]));

    let hits = pairs[1].1;
    let summary: Vec<_> = hits
        .iter()
        .map(|h| (h.target_gene(), h.bit_score(), h.total_hit_count))
        .collect();
    assert_eq!(summary, vec![("qg_0001", 95.0, 2), ("qg_0002", 60.0, 1)]);
    assert!(hits.iter().all(|h| h.reaction_id == "r2"));

    // r1 never reached the aligner
    assert_eq!(orch.aligner().call_count(), 1);
    assert_eq!(batch.gene_hits[1].candidate_gene_count, 2);
}

#[tokio::test]
async fn test_genes_without_sequence_are_not_aligned() {
    let work = TempDir::new().unwrap();
    let proteome = write_proteome(work.path());

    let client = ScriptedRelationClient::new()
        .respond("r1", traversal_response("r1", &[gene("g1", "MKTAYIAK"), gene("g2", "")]))
        .respond("r2", traversal_response("r2", &[gene("g3", "  ")]));
    let aligner = MockAligner::new().with_output("r1", tabular_row("g1", "qg_0001", 70.0));

    let orch = orchestrator(client, aligner, settings(1), &work);
    let batch = orch
        .run(&ids(&["r1", "r2"]), &proteome, &CancellationToken::new())
        .await
        .unwrap();

    let fasta = orch.aligner().query_fasta_for("r1").unwrap();
    assert_eq!(fasta, ">g1\nMKTAYIAK\n");
    assert_eq!(batch.gene_hits[0].missing_gene_ids, vec!["g2"]);
    assert_eq!(batch.gene_hits[0].candidate_gene_count, 1);

    assert_eq!(batch.gene_hits[1].outcome, ReactionOutcome::NoCandidates);
    assert_eq!(batch.gene_hits[1].missing_gene_ids, vec!["g3"]);
    assert_eq!(orch.aligner().call_count(), 1);
}

#[tokio::test]
async fn test_retrieval_failure_aborts_batch() {
    let work = TempDir::new().unwrap();
    let proteome = write_proteome(work.path());

    let client = ScriptedRelationClient::new()
        .respond("r1", traversal_response("r1", &[gene("g1", "MKT")]))
        .respond("r2", QueryResponse::with_error("ArangoServerError", "query killed"))
        .respond("r3", traversal_response("r3", &[gene("g3", "MKT")]));
    let aligner = MockAligner::new().with_output("r1", tabular_row("g1", "qg_0001", 70.0));

    let orch = orchestrator(client, aligner, settings(1), &work);
    let err = orch
        .run(&ids(&["r1", "r2", "r3"]), &proteome, &CancellationToken::new())
        .await
        .unwrap_err();

    match err {
        RxnFinderError::FatalRetrieval { reaction_id, code, attempts, .. } => {
            assert_eq!(reaction_id, "rxn_reaction/r2");
            assert_eq!(code, "ArangoServerError");
            assert_eq!(attempts, 3);
        }
        other => panic!("unexpected error: {other}"),
    }
    // r3 had not started when r2 failed
    assert_eq!(orch.retriever().client().calls_for("r3"), 0);
}

#[tokio::test]
async fn test_transient_error_recovers_within_budget() {
    let work = TempDir::new().unwrap();
    let proteome = write_proteome(work.path());

    let client = ScriptedRelationClient::new()
        .respond_once("r1", QueryResponse::with_error("ArangoServerError", "busy"))
        .respond("r1", traversal_response("r1", &[gene("g1", "MKT")]));
    let aligner = MockAligner::new().with_output("r1", tabular_row("g1", "qg_0001", 70.0));

    let orch = orchestrator(client, aligner, settings(1), &work);
    let batch = orch
        .run(&ids(&["r1"]), &proteome, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(batch.total_hits(), 1);
    assert_eq!(orch.retriever().client().calls_for("r1"), 2);
}

#[tokio::test]
async fn test_alignment_failure_aborts_batch() {
    let work = TempDir::new().unwrap();
    let proteome = write_proteome(work.path());

    let client = ScriptedRelationClient::new()
        .respond("r1", traversal_response("r1", &[gene("g1", "MKT")]));
    let aligner = MockAligner::new().with_failure("r1");

    let orch = orchestrator(client, aligner, settings(1), &work);
    let err = orch
        .run(&ids(&["r1"]), &proteome, &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, RxnFinderError::Alignment(_)));
}

#[tokio::test]
async fn test_timeout_is_per_reaction() {
    let work = TempDir::new().unwrap();
    let proteome = write_proteome(work.path());

    let client = ScriptedRelationClient::new()
        .respond("slow", traversal_response("slow", &[gene("g1", "MKT")]))
        .respond("fast", traversal_response("fast", &[gene("g2", "MSL")]));
    let aligner = MockAligner::new()
        .with_delay("slow", Duration::from_secs(30))
        .with_output("fast", tabular_row("g2", "qg_0002", 88.0));

    let settings = SearchSettings {
        alignment_timeout: Some(Duration::from_millis(100)),
        ..settings(2)
    };
    let orch = orchestrator(client, aligner, settings, &work);
    let batch = orch
        .run(&ids(&["slow", "fast"]), &proteome, &CancellationToken::new())
        .await
        .unwrap();

    assert!(matches!(
        batch.gene_hits[0].outcome,
        ReactionOutcome::AlignmentTimedOut { .. }
    ));
    assert!(batch.gene_hits[0].ranked_hits.is_empty());
    assert_eq!(batch.gene_hits[1].outcome, ReactionOutcome::Ranked);
    assert_eq!(batch.gene_hits[1].ranked_hits.len(), 1);
}

#[tokio::test]
async fn test_cancelled_before_start() {
    let work = TempDir::new().unwrap();
    let proteome = write_proteome(work.path());

    let client = ScriptedRelationClient::new()
        .respond("r1", traversal_response("r1", &[gene("g1", "MKT")]));
    let orch = orchestrator(client, MockAligner::new(), settings(1), &work);

    let cancel = CancellationToken::new();
    cancel.cancel();
    let err = orch.run(&ids(&["r1"]), &proteome, &cancel).await.unwrap_err();

    assert!(matches!(err, RxnFinderError::Cancelled));
    assert_eq!(orch.retriever().client().call_count(), 0);
}

#[tokio::test]
async fn test_cancel_mid_batch_finishes_in_flight_and_skips_the_rest() {
    init_test_logging();
    let work = TempDir::new().unwrap();
    let proteome = write_proteome(work.path());

    let client = ScriptedRelationClient::new()
        .respond("r1", traversal_response("r1", &[gene("g1", "MKT")]))
        .respond("r2", traversal_response("r2", &[gene("g2", "MSL")]));
    let aligner = MockAligner::new()
        .with_output("r1", tabular_row("g1", "qg_0001", 70.0))
        .with_delay("r1", Duration::from_millis(300));
    let orch = orchestrator(client, aligner, settings(1), &work);

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let err = orch.run(&ids(&["r1", "r2"]), &proteome, &cancel).await.unwrap_err();

    assert!(matches!(err, RxnFinderError::Cancelled));
    // r1 was already aligning and ran to completion
    assert_eq!(orch.aligner().call_count(), 1);
    assert!(orch.aligner().query_fasta_for("r1").is_some());
    assert_eq!(orch.retriever().client().calls_for("r2"), 0);
}

#[tokio::test]
async fn test_concurrency_never_exceeds_limit() {
    let work = TempDir::new().unwrap();
    let proteome = write_proteome(work.path());

    let reactions = ["r1", "r2", "r3", "r4", "r5"];
    let mut client = ScriptedRelationClient::new();
    let mut aligner = MockAligner::new();
    for (i, id) in reactions.iter().enumerate() {
        let gene_id = format!("g{}", i);
        client = client.respond(id, traversal_response(id, &[gene(&gene_id, "MKT")]));
        aligner = aligner
            .with_output(id, tabular_row(&gene_id, "qg_0001", 60.0))
            .with_delay(id, Duration::from_millis(80));
    }

    let orch = orchestrator(client, aligner, settings(2), &work);
    let batch = orch
        .run(&ids(&reactions), &proteome, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(batch.len(), 5);
    assert_eq!(orch.aligner().call_count(), 5);
    assert_eq!(orch.aligner().max_in_flight(), 2);
}

#[tokio::test]
async fn test_rejected_request_is_not_retried() {
    let work = TempDir::new().unwrap();
    let proteome = write_proteome(work.path());

    let client = ScriptedRelationClient::new()
        .fail_once(
            "r1",
            RxnFinderError::RequestRejected {
                status: 400,
                body: "bad bind parameter".to_string(),
            },
        )
        .respond("r1", traversal_response("r1", &[gene("g1", "MKT")]));
    let orch = orchestrator(client, MockAligner::new(), settings(1), &work);

    let err = orch
        .run(&ids(&["r1"]), &proteome, &CancellationToken::new())
        .await
        .unwrap_err();

    match err {
        RxnFinderError::FatalRetrieval { code, attempts, .. } => {
            assert_eq!(code, "HTTP 400");
            assert_eq!(attempts, 1);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(orch.retriever().client().calls_for("r1"), 1);
    assert_eq!(orch.aligner().call_count(), 0);
}

#[tokio::test]
async fn test_candidate_scratch_is_removed_after_run() {
    let work = TempDir::new().unwrap();
    let proteome = write_proteome(work.path());

    let client = ScriptedRelationClient::new()
        .respond("r1", traversal_response("r1", &[gene("g1", "MKT")]));
    let aligner = MockAligner::new().with_output("r1", tabular_row("g1", "qg_0001", 70.0));
    let orch = orchestrator(client, aligner, settings(1), &work);

    orch.run(&ids(&["r1"]), &proteome, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(
        orch.aligner().query_fasta_for("r1").as_deref(),
        Some(">g1\nMKT\n")
    );
    let root = work.path().join("work");
    assert!(root.is_dir());
    assert_eq!(std::fs::read_dir(&root).unwrap().count(), 0);
}

#[tokio::test]
async fn test_empty_batch_is_rejected() {
    let work = TempDir::new().unwrap();
    let proteome = write_proteome(work.path());
    let orch = orchestrator(
        ScriptedRelationClient::new(),
        MockAligner::new(),
        settings(1),
        &work,
    );

    let err = orch
        .run(&[], &proteome, &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, RxnFinderError::InvalidBatchInput(_)));

    assert!(normalize_reactions(None, Some("\n\n")).is_err());
}

#[tokio::test]
async fn test_floors_and_exclude_self_reach_the_query() {
    let work = TempDir::new().unwrap();
    let proteome = write_proteome(work.path());

    let client = ScriptedRelationClient::new()
        .respond("r1", QueryResponse::with_results(vec![]));
    let settings = SearchSettings {
        structural_similarity_floor: 0.7,
        difference_similarity_floor: 0.5,
        exclude_self: true,
        ..settings(1)
    };
    let orch = orchestrator(client, MockAligner::new(), settings, &work);
    orch.run(&ids(&["r1"]), &proteome, &CancellationToken::new())
        .await
        .unwrap();

    let requests = orch.retriever().client().requests();
    assert_eq!(requests[0].rid, "rxn_reaction/r1");
    assert_eq!(requests[0].sf_sim, 0.7);
    assert_eq!(requests[0].df_sim, 0.5);
    assert!(requests[0].exclude_self);
}
