// Application layer: gate facade, shared async access and the console command surface.

pub mod console;
pub mod gate;
pub mod shared;
