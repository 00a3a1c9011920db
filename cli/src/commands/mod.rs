pub mod approval_process;
pub mod deploy;
pub mod propose_upgrade;
