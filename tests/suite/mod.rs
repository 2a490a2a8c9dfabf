mod calculator;
mod cms;
mod content;
mod leads;
