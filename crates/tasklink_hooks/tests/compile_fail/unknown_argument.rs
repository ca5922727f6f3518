use tasklink_hooks::task_hooks;

pub struct Job;

#[task_hooks(priority = 1)]
impl Job {
    #[pre_task]
    pub fn check(&self, _input: &u32) {}
}

fn main() {}
