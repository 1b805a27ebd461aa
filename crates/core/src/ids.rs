// SPDX-License-Identifier: MIT

//! Opaque ID types for every entity in the data model.

crate::define_id! {
    /// A repository under management.
    pub struct ProjectId("proj");
}

crate::define_id! {
    /// One scout→strategize→build→review→merge iteration for a project.
    pub struct CycleId("cycl");
}

crate::define_id! {
    /// A candidate improvement authored by the strategize stage.
    pub struct ProposalId("prop");
}

crate::define_id! {
    /// A durable unit of work in the job queue.
    pub struct JobId("job-");
}

crate::define_id! {
    /// Per-proposal execution record tracking the stage tape.
    pub struct PipelineRunId("prun");
}

crate::define_id! {
    /// An append-only observable pipeline event.
    pub struct BranchEventId("bevt");
}

crate::define_id! {
    /// A recoverable commit pointer.
    pub struct CheckpointId("ckpt");
}

crate::define_id! {
    /// A scout-stage observation that seeds strategize.
    pub struct FindingId("find");
}

crate::define_id! {
    /// A structured log line emitted by a stage worker.
    pub struct RunLogId("rlog");
}

crate::define_id! {
    /// An advisory record of a past autonomy decision.
    pub struct StrategyMemoryId("smem");
}

crate::define_id! {
    /// A human-submitted idea read by the strategize stage.
    pub struct UserIdeaId("idea");
}
