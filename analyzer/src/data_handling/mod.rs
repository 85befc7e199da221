pub mod summarized_pharmaco;
