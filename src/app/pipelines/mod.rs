pub mod topic_pipeline;
