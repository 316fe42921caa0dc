pub mod stage1_select;
pub mod stage2_percentile;
pub mod stage3_composite;
pub mod stage4_report;
