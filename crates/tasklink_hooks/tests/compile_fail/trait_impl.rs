use tasklink_hooks::task_hooks;

pub struct Job;

#[task_hooks(input = u32)]
impl Default for Job {
    fn default() -> Self {
        Job
    }
}

fn main() {}
