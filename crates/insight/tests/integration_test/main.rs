mod delivery;
mod end_to_end;
mod fixtures;
