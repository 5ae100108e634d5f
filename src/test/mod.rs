mod params;
mod scheduler;
mod trace;
