use tasklink_hooks::task_hooks;

pub struct Job;

#[task_hooks]
impl Job {}

fn main() {}
