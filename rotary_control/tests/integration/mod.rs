mod cascade;
mod config;
mod motor_physics;
