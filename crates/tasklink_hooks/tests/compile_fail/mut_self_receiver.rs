use tasklink_hooks::task_hooks;

pub struct Job;

#[task_hooks]
impl Job {
    #[pre_task]
    pub fn check(&mut self, _input: &u32) {}
}

fn main() {}
