pub mod ai_service;
pub mod completion_client;
pub mod extraction_service;
pub mod normalization_service;
pub mod paper_service;
pub mod prompt_service;
pub mod reconciliation_service;
pub mod subject_bank;
pub mod template_service;
